use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn create_main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("Send", "send"),
            InlineKeyboardButton::callback("Balance", "balance"),
        ],
        vec![
            InlineKeyboardButton::callback("History", "history"),
            InlineKeyboardButton::callback("🔄 Refresh", "refresh"),
        ],
    ])
}

pub fn create_history_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("🔄 Refresh", "refresh"),
        InlineKeyboardButton::callback("Send", "send"),
        InlineKeyboardButton::callback("🗑 Clear", "clear"),
    ]])
}

pub fn create_clear_confirmation_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Yes, clear", "clear_confirm"),
        InlineKeyboardButton::callback("Cancel", "clear_cancel"),
    ]])
}
