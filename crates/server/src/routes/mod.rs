pub mod cron;
pub mod devotionals;
pub mod health;
pub mod notifications;
pub mod subscriptions;
