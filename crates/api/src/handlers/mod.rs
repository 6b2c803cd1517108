pub mod cart;
pub mod lifecycle;
pub mod webhook_admin;
pub mod widget;
