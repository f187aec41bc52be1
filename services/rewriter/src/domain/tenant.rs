/// テナント識別子
///
/// hostヘッダーの最初の`.`区切りラベルをそのままテナントキーとして扱う。
/// 大文字小文字の正規化や文字種の検証は行わない。
use std::fmt;

use thiserror::Error;

/// テナント導出のエラー型
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantError {
    /// hostが空、または先頭ラベルが空（".example.com"など）
    #[error("hostヘッダーからテナントを導出できません: {0:?}")]
    EmptyLabel(String),
}

/// サブドメインラベルで識別されるテナント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant(String);

impl Tenant {
    /// hostヘッダー値からテナントを導出する
    ///
    /// `.`で分割した先頭要素をテナントキーとする。ドットを含まないhostは
    /// 全体が1ラベルとしてそのままテナントキーになる。
    ///
    /// # 引数
    /// * `host` - リクエストのhostヘッダー値
    ///
    /// # 戻り値
    /// * `Ok(Tenant)` - 導出されたテナント
    /// * `Err(TenantError)` - 先頭ラベルが空の場合
    pub fn from_host(host: &str) -> Result<Self, TenantError> {
        let label = host.split('.').next().unwrap_or("");
        if label.is_empty() {
            return Err(TenantError::EmptyLabel(host.to_string()));
        }
        Ok(Self(label.to_string()))
    }

    /// テナントキーを文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 先頭ラベルがテナントキーになる
    #[test]
    fn test_from_host_takes_first_label() {
        let tenant = Tenant::from_host("acme.app.example.com").unwrap();
        assert_eq!(tenant.as_str(), "acme");
    }

    /// ドットを含まないhostは全体がテナントキーになる
    #[test]
    fn test_from_host_without_dots() {
        let tenant = Tenant::from_host("localhost").unwrap();
        assert_eq!(tenant.as_str(), "localhost");
    }

    /// 大文字小文字は与えられたまま保持される
    #[test]
    fn test_from_host_preserves_case() {
        let tenant = Tenant::from_host("AcMe.app.example.com").unwrap();
        assert_eq!(tenant.as_str(), "AcMe");
    }

    /// 空のhostはエラー
    #[test]
    fn test_from_host_empty_is_error() {
        let err = Tenant::from_host("").unwrap_err();
        assert_eq!(err, TenantError::EmptyLabel(String::new()));
    }

    /// 先頭ラベルが空のhost（ドット始まり）はエラー
    #[test]
    fn test_from_host_leading_dot_is_error() {
        let err = Tenant::from_host(".example.com").unwrap_err();
        assert_eq!(err, TenantError::EmptyLabel(".example.com".to_string()));
    }

    /// Display実装はテナントキーをそのまま出力する
    #[test]
    fn test_display() {
        let tenant = Tenant::from_host("barexemplo.app.example.com").unwrap();
        assert_eq!(tenant.to_string(), "barexemplo");
    }
}
