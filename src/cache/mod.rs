pub mod hash;
pub mod history;
pub mod storage;

pub use hash::{compute_hash, new_campaign_id};
pub use history::{HISTORY_SLOT, HistoryStore};
pub use storage::LocalFileStorage;

pub fn get_extension_from_mime_type(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}
