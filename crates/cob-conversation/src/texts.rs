//! User-facing texts. Hardcoded in the source locale; there is no
//! translation layer.

pub const WELCOME: &str =
    "🍰 Добро пожаловать! Я приму ваш заказ на торт.\nКак вас зовут? (Имя и фамилия)";

/// Re-asked when the name step receives only whitespace.
pub const ASK_NAME: &str = "Как вас зовут? (Имя и фамилия)";

pub const ASK_PHONE: &str = "📞 Укажите номер телефона (например, +992 900-000-000):";

pub const INVALID_PHONE: &str = "❗ Телефон некорректен. Попробуйте ещё раз:";

pub const ASK_COMMENT: &str =
    "💬 Добавьте комментарий (вкус, вес, дата) или «-», если без комментариев:";

pub const ORDER_SENT: &str =
    "Спасибо! 🎉 Ваш заказ отправлен администратору. Мы свяжемся с вами в ближайшее время.";

pub const ORDER_FAILED: &str = "Упс! Что-то пошло не так. Попробуйте позже.";

pub const CANCELLED: &str = "Заказ отменён. Чтобы начать сначала, отправьте /start.";
