//! ブラウザ側の外部接続

pub mod fetch;
pub mod page;
