//! 服务模块
//!
//! - [`MailService`] - 订单确认邮件 (尽力而为，不参与事务)

mod mail;

pub use mail::MailService;
