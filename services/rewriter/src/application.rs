// アプリケーション層モジュール
pub mod rewrite_handler;

// 再エクスポート
pub use rewrite_handler::{RewriteError, RewriteHandler};
