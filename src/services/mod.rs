pub mod robots;
pub mod slug;
pub mod upload;
