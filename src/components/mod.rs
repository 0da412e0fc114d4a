//! UI Components
//!
//! Leptos components of the macro editor page.

mod button_card;
mod channel_select;
mod content_editor;
mod delete_confirm_button;
mod editor_page;
mod group_card;
mod name_editor;
mod toasts;

pub use button_card::ButtonCard;
pub use channel_select::ChannelSelect;
pub use content_editor::ContentEditor;
pub use delete_confirm_button::DeleteConfirmButton;
pub use editor_page::EditorPage;
pub use group_card::GroupCard;
pub use name_editor::NameEditor;
pub use toasts::Toasts;
