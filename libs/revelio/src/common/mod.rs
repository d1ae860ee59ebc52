mod errors;
mod utils;

pub use errors::{RevelioError, Result};
pub use utils::{encode_image, init_logger, init_logger_exe, read_image_base64};
