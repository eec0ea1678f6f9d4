pub mod automation;
pub mod chat;
pub mod market_data;
pub mod report;
