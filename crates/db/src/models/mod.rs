pub mod devotional;
pub mod notification;
pub mod profile;
pub mod subscription;
