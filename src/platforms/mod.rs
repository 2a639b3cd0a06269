pub mod bilibili;
pub mod traits;
