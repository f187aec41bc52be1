/// 書き換え関数のデプロイ設定
///
/// バケット名やステージングテナントキーはデプロイ時に固定される値で、
/// 既定値がそのまま本番設定になる。Lambda@Edgeは環境変数を配布しないため、
/// 環境変数による上書きはローカル実行とテストのための仕組み。
use crate::domain::Environment;

/// ステージング環境のテンプレートバケット
const STAGING_BUCKET: &str = "cartappio-app-hml";

/// 本番環境のテンプレートバケット
const PRODUCTION_BUCKET: &str = "cartappio-app-prod";

/// テンプレートオブジェクトのキー
const TEMPLATE_KEY: &str = "index.html";

/// ステージング環境に割り当てられた固定テナントキー
const STAGING_TENANT: &str = "barexemplo";

/// メタデータAPIのドメインサフィックス
const API_DOMAIN: &str = "sindiapp.app.br";

/// テンプレートバケットのリージョン
const BUCKET_REGION: &str = "us-east-1";

/// 書き換え関数の設定値一式
#[derive(Debug, Clone)]
pub struct RewriterConfig {
    staging_bucket: String,
    production_bucket: String,
    template_key: String,
    staging_tenant: String,
    api_domain: String,
    bucket_region: String,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            staging_bucket: STAGING_BUCKET.to_string(),
            production_bucket: PRODUCTION_BUCKET.to_string(),
            template_key: TEMPLATE_KEY.to_string(),
            staging_tenant: STAGING_TENANT.to_string(),
            api_domain: API_DOMAIN.to_string(),
            bucket_region: BUCKET_REGION.to_string(),
        }
    }
}

impl RewriterConfig {
    /// 環境変数から設定を読み込む（未設定の項目は既定値）
    ///
    /// 環境変数:
    /// - STAGING_BUCKET: ステージング用テンプレートバケット名
    /// - PRODUCTION_BUCKET: 本番用テンプレートバケット名
    /// - TEMPLATE_KEY: テンプレートオブジェクトのキー
    /// - STAGING_TENANT: ステージング用テナントキー
    /// - API_DOMAIN: メタデータAPIのドメインサフィックス
    /// - BUCKET_REGION: テンプレートバケットのリージョン
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            staging_bucket: env_or("STAGING_BUCKET", defaults.staging_bucket),
            production_bucket: env_or("PRODUCTION_BUCKET", defaults.production_bucket),
            template_key: env_or("TEMPLATE_KEY", defaults.template_key),
            staging_tenant: env_or("STAGING_TENANT", defaults.staging_tenant),
            api_domain: env_or("API_DOMAIN", defaults.api_domain),
            bucket_region: env_or("BUCKET_REGION", defaults.bucket_region),
        }
    }

    /// 環境に対応するテンプレートバケット名を取得
    ///
    /// バケットの選択は必ず環境セレクタから導出する。テナント比較を
    /// ここで繰り返さないことで、セレクタとバケットの不整合を防ぐ。
    pub fn bucket_for(&self, environment: Environment) -> &str {
        match environment {
            Environment::Staging => &self.staging_bucket,
            Environment::Production => &self.production_bucket,
        }
    }

    /// テンプレートオブジェクトのキーを取得
    pub fn template_key(&self) -> &str {
        &self.template_key
    }

    /// ステージング用テナントキーを取得
    pub fn staging_tenant(&self) -> &str {
        &self.staging_tenant
    }

    /// メタデータAPIのドメインサフィックスを取得
    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    /// テンプレートバケットのリージョンを取得
    pub fn bucket_region(&self) -> &str {
        &self.bucket_region
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}
