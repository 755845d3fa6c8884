mod diagnosis;
mod export;
mod navigation;
mod notes;
mod user;

pub use diagnosis::{
    __cmd__get_report, __cmd__run_analysis, __cmd__select_photo, __cmd__submit_intake,
    __cmd__update_intake, get_report, run_analysis, select_photo, submit_intake, update_intake,
};
pub use export::{__cmd__export_notes, export_notes};
pub use navigation::{__cmd__get_session, __cmd__navigate, get_session, navigate};
pub use notes::{
    __cmd__confirm_rewrite, __cmd__delete_note, __cmd__get_contrast, __cmd__get_note_editor,
    __cmd__list_notes, __cmd__save_note, confirm_rewrite, delete_note, get_contrast,
    get_note_editor, list_notes, save_note,
};
pub use user::{__cmd__get_user_info, get_user_info};
