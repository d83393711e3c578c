pub static DEFAULT_ICON_SIZE: u32 = 8;
pub static DEFAULT_HEADER_NAME: &str = "Icons.h";
pub static DEFAULT_ICONS_DIR: &str = "icons";
pub static DEFAULT_ICON_EXTENSION: &str = "gif";

pub static TRANSPARENT_FILL_BLACK: [u8; 3] = [0, 0, 0];
