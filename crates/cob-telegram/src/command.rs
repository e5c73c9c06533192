use teloxide::utils::command::BotCommands;

/// Commands the order conversation reacts to.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum BotCommand {
    #[command(description = "оформить заказ торта")]
    Start,
    #[command(description = "отменить заказ")]
    Cancel,
}
