/// 配信環境の選択
///
/// テナントキーとステージング用テナントキーの完全一致比較だけで
/// ステージング/本番を切り替える。選択結果はリクエストローカルな値であり、
/// 呼び出しをまたいで保持してはならない。
use std::fmt;

use crate::domain::Tenant;

/// 配信環境（ステージング/本番）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// ステージング（HML）
    Staging,
    /// 本番
    Production,
}

impl Environment {
    /// テナントから環境を選択する
    ///
    /// # 引数
    /// * `tenant` - リクエストから導出されたテナント
    /// * `staging_tenant` - ステージング環境に割り当てられた固定テナントキー
    pub fn for_tenant(tenant: &Tenant, staging_tenant: &str) -> Self {
        if tenant.as_str() == staging_tenant {
            Environment::Staging
        } else {
            Environment::Production
        }
    }

    /// メタデータAPIのホスト名プレフィックス
    pub fn api_host_prefix(&self) -> &'static str {
        match self {
            Environment::Staging => "hml-api",
            Environment::Production => "api",
        }
    }

    /// テナントマニフェストURLを構築する
    ///
    /// # 引数
    /// * `tenant` - テナント
    /// * `api_domain` - メタデータAPIのドメインサフィックス
    pub fn manifest_url(&self, tenant: &Tenant, api_domain: &str) -> String {
        format!(
            "https://{}.{}/api/app/metadata/v1/tenant-manifest?tenant_key={}",
            self.api_host_prefix(),
            api_domain,
            tenant
        )
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Staging => f.write_str("staging"),
            Environment::Production => f.write_str("production"),
        }
    }
}
