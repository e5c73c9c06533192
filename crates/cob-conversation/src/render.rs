//! Order notification rendering.
//!
//! User-supplied values are escaped with teloxide's markup helpers; the
//! template text is written pre-formatted for that markup and is never escaped.

use cob_schemas::Markup;
use teloxide::utils::{html, markdown};

/// A rendered order notification, ready to send with `markup` as parse mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNotification {
    pub text: String,
    pub markup: Markup,
}

/// Render the group notification for one completed order.
pub fn render_order_notification(name: &str, phone: &str, comment: &str, markup: Markup) -> String {
    match markup {
        Markup::Html => format!(
            "🎂 <b>Новый заказ торта!</b>\n\n\
             <b>Имя:</b> {}\n\
             <b>Телефон:</b> {}\n\
             <b>Комментарий:</b> {}",
            html::escape(name),
            html::escape(phone),
            html::escape(comment),
        ),
        Markup::MarkdownV2 => format!(
            "🎂 *Новый заказ торта\\!*\n\n\
             *Имя:* {}\n\
             *Телефон:* {}\n\
             *Комментарий:* {}",
            markdown::escape(name),
            markdown::escape(phone),
            markdown::escape(comment),
        ),
    }
}
