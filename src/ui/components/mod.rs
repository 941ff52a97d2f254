pub mod confirm_dialog;
pub mod history_table;
pub mod home_menu;
pub mod progress_bar;
pub mod question_card;
pub mod results_panel;
