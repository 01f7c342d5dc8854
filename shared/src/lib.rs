#[macro_use]
extern crate diesel;

pub mod db_pg;
pub mod enums;
pub mod util;
