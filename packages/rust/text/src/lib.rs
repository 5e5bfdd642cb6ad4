//! Text normalization for matching spoken queries against scraped VPIS data.
//!
//! - [`normalize_course_name`] turns a raw course title into a canonical join key
//! - [`room_key`] turns a prefixed room identifier (`Is-H409`) into a local key (`h409`)

mod course;
mod room;

pub use course::normalize_course_name;
pub use room::{room_key, room_key_lenient};
