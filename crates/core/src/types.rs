/// Display format used for upload times shown to browser clients.
pub const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
