/// テナント別HTML書き換えハンドラー
///
/// 1リクエストにつき1回呼び出され、hostヘッダーからテナントを導出し、
/// 環境に応じたバケットからテンプレートを取得して置換を適用し、
/// 合成レスポンスを返す。リトライや取得結果のキャッシュは行わない。
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{
    EdgeResponse, Environment, Tenant, TenantError, ViewerRequestEvent, rewrite_template,
};
use crate::infrastructure::{RewriterConfig, TemplateStore, TemplateStoreError};

/// 書き換え処理のエラー型
#[derive(Debug, Error)]
pub enum RewriteError {
    /// イベントが期待する形式でデシリアライズできない
    #[error("リクエストイベントの形式が不正: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    /// hostヘッダーが存在しない
    #[error("hostヘッダーがリクエストに存在しません")]
    MissingHostHeader,
    /// テナント導出の失敗
    #[error(transparent)]
    Tenant(#[from] TenantError),
    /// テンプレート取得の失敗
    #[error(transparent)]
    TemplateFetch(#[from] TemplateStoreError),
}

/// テナント別HTML書き換えハンドラー
pub struct RewriteHandler<TS: TemplateStore> {
    store: TS,
    config: RewriterConfig,
}

impl<TS: TemplateStore> RewriteHandler<TS> {
    /// 新しいハンドラーを作成
    ///
    /// # 引数
    /// * `store` - テンプレートストア
    /// * `config` - デプロイ設定
    pub fn new(store: TS, config: RewriterConfig) -> Self {
        Self { store, config }
    }

    /// イベントを処理してレスポンスを返す
    ///
    /// 内部で発生したすべてのエラーをここで捕捉し、詳細をログに残した上で
    /// 固定の500レスポンスに変換する。呼び出し1回につき必ず構造化された
    /// レスポンスを1つ返し、例外を外へ伝播させない。
    pub async fn handle(&self, payload: Value) -> EdgeResponse {
        match self.rewrite(payload).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "テナント向けレスポンスの書き換えに失敗");
                EdgeResponse::internal_error()
            }
        }
    }

    /// 書き換えの本体
    ///
    /// # 処理フロー
    /// 1. イベントをデシリアライズしhostヘッダーを取得
    /// 2. hostの先頭ラベルからテナントを導出
    /// 3. ステージングテナントキーとの比較で環境を選択（リクエストローカル）
    /// 4. マニフェストURLを構築
    /// 5. 環境に対応するバケットからテンプレートを取得
    /// 6. 置換を適用しレスポンスを組み立て
    pub async fn rewrite(&self, payload: Value) -> Result<EdgeResponse, RewriteError> {
        let event: ViewerRequestEvent = serde_json::from_value(payload)?;
        let host = event.host().ok_or(RewriteError::MissingHostHeader)?;

        let tenant = Tenant::from_host(host)?;
        let environment = Environment::for_tenant(&tenant, self.config.staging_tenant());
        let manifest_url = environment.manifest_url(&tenant, self.config.api_domain());

        info!(
            host = %host,
            tenant = %tenant,
            environment = %environment,
            "index.html書き換えリクエスト受信"
        );

        let bucket = self.config.bucket_for(environment);
        let template = self.store.fetch(bucket, self.config.template_key()).await?;

        let html = rewrite_template(&template.body, &tenant, &manifest_url);

        info!(
            tenant = %tenant,
            bucket = %bucket,
            size = html.len(),
            "書き換え完了"
        );

        Ok(EdgeResponse::rewritten_html(
            &html,
            &template.last_modified,
            &template.etag,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BodyEncoding, EdgeStatus};
    use crate::infrastructure::TemplateObject;
    use async_trait::async_trait;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use chrono::DateTime;
    use serde_json::json;
    use std::sync::Mutex;

    const TEMPLATE: &str = concat!(
        "<html><head>",
        r#"<link rel="manifest" href="/manifest.json">"#,
        r#"<link rel="apple-touch-icon" href="/icons/TENANT_DOMAIN.png">"#,
        "</head><body>TENANT_DOMAIN</body></html>",
    );

    /// テスト用のインメモリテンプレートストア
    ///
    /// 取得要求されたバケットとキーを記録する。
    struct MockTemplateStore {
        object: Option<TemplateObject>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockTemplateStore {
        fn with_template(body: &str) -> Self {
            Self {
                object: Some(TemplateObject {
                    body: body.to_string(),
                    last_modified: DateTime::from_timestamp(1_445_412_480, 0).unwrap(),
                    etag: "\"d41d8cd98f00b204e9800998ecf8427e\"".to_string(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                object: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<(String, String)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TemplateStore for MockTemplateStore {
        async fn fetch(
            &self,
            bucket: &str,
            key: &str,
        ) -> Result<TemplateObject, TemplateStoreError> {
            self.requests
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));

            match &self.object {
                Some(object) => Ok(object.clone()),
                None => Err(TemplateStoreError::GetObject {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: "NoSuchKey".to_string(),
                }),
            }
        }
    }

    fn event_for_host(host: &str) -> Value {
        json!({
            "Records": [{
                "cf": {
                    "request": {
                        "method": "GET",
                        "uri": "/index.html",
                        "headers": {
                            "host": [{ "key": "Host", "value": host }]
                        }
                    }
                }
            }]
        })
    }

    fn handler_with_template() -> RewriteHandler<MockTemplateStore> {
        RewriteHandler::new(
            MockTemplateStore::with_template(TEMPLATE),
            RewriterConfig::default(),
        )
    }

    fn decoded_body(response: &EdgeResponse) -> String {
        let bytes = BASE64.decode(&response.body).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    /// ステージングテナント: HMLバケットとhml-api prefixが選択される
    #[tokio::test]
    async fn test_staging_tenant_full_flow() {
        let handler = handler_with_template();
        let response = handler
            .handle(event_for_host("barexemplo.app.example.com"))
            .await;

        assert_eq!(response.status, EdgeStatus::Code(200));
        assert_eq!(response.body_encoding, BodyEncoding::Base64);
        assert_eq!(
            handler.store.requested(),
            vec![("cartappio-app-hml".to_string(), "index.html".to_string())]
        );

        let body = decoded_body(&response);
        let expected = concat!(
            "<html><head>\n",
            "<!-- Funcao Lambda Executada com sucesso -->",
            r#"<link rel="manifest" href="https://hml-api.sindiapp.app.br/api/app/metadata/v1/tenant-manifest?tenant_key=barexemplo">"#,
            r#"<link rel="apple-touch-icon" href="/icons/barexemplo.png">"#,
            "</head><body>barexemplo</body></html>",
        );
        assert_eq!(body, expected);
    }

    /// 本番テナント: prodバケットとapi prefixが選択される
    #[tokio::test]
    async fn test_production_tenant_full_flow() {
        let handler = handler_with_template();
        let response = handler.handle(event_for_host("acme.app.example.com")).await;

        assert_eq!(response.status, EdgeStatus::Code(200));
        assert_eq!(
            handler.store.requested(),
            vec![("cartappio-app-prod".to_string(), "index.html".to_string())]
        );

        let body = decoded_body(&response);
        assert!(body.contains(
            r#"href="https://api.sindiapp.app.br/api/app/metadata/v1/tenant-manifest?tenant_key=acme""#
        ));
        assert!(body.contains("<body>acme</body>"));
        assert!(!body.contains("TENANT_DOMAIN"));
    }

    /// 成功レスポンスにはオブジェクトメタデータ由来のヘッダーが入る
    #[tokio::test]
    async fn test_success_response_headers() {
        let handler = handler_with_template();
        let response = handler.handle(event_for_host("acme.app.example.com")).await;

        let header = |name: &str| response.headers.get(name).unwrap()[0].value.clone();
        assert_eq!(header("content-type"), "text/html; charset=utf-8");
        assert_eq!(header("last-modified"), "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(header("etag"), "\"d41d8cd98f00b204e9800998ecf8427e\"");
        assert_eq!(header("cache-control"), "public, max-age=0, must-revalidate");
    }

    /// テンプレート取得失敗は固定の500レスポンスになる
    #[tokio::test]
    async fn test_fetch_failure_yields_fixed_500() {
        let handler = RewriteHandler::new(MockTemplateStore::failing(), RewriterConfig::default());
        let response = handler.handle(event_for_host("acme.app.example.com")).await;

        assert_eq!(response.status, EdgeStatus::Text("500".to_string()));
        assert_eq!(response.status_description, "Internal Server Error");
        assert_eq!(response.body, "Erro ao modificar resposta para tenant.");
        assert_eq!(response.body_encoding, BodyEncoding::Text);
    }

    /// hostヘッダー欠落は固定の500レスポンスになる
    #[tokio::test]
    async fn test_missing_host_yields_fixed_500() {
        let handler = handler_with_template();
        let payload = json!({
            "Records": [{ "cf": { "request": { "headers": {} } } }]
        });

        let response = handler.handle(payload).await;

        assert_eq!(response.status, EdgeStatus::Text("500".to_string()));
        assert_eq!(response.body_encoding, BodyEncoding::Text);
        // テンプレート取得まで到達しない
        assert!(handler.store.requested().is_empty());
    }

    /// イベント形式が不正な場合も固定の500レスポンスになる
    #[tokio::test]
    async fn test_malformed_event_yields_fixed_500() {
        let handler = handler_with_template();
        let response = handler.handle(json!({ "Records": "not-an-array" })).await;

        assert_eq!(response.status, EdgeStatus::Text("500".to_string()));
        assert!(handler.store.requested().is_empty());
    }

    /// 先頭ラベルが空のhostは固定の500レスポンスになる
    #[tokio::test]
    async fn test_empty_tenant_label_yields_fixed_500() {
        let handler = handler_with_template();
        let response = handler.handle(event_for_host(".app.example.com")).await;

        assert_eq!(response.status, EdgeStatus::Text("500".to_string()));
        assert!(handler.store.requested().is_empty());
    }

    /// rewriteはhost欠落を明示的なエラーで返す
    #[tokio::test]
    async fn test_rewrite_reports_missing_host() {
        let handler = handler_with_template();
        let result = handler.rewrite(json!({ "Records": [] })).await;

        assert!(matches!(result, Err(RewriteError::MissingHostHeader)));
    }

    /// 置換パターンを含まないテンプレートはそのままBase64化される
    #[tokio::test]
    async fn test_template_without_patterns_passes_through() {
        let handler = RewriteHandler::new(
            MockTemplateStore::with_template("<html><body>static</body></html>"),
            RewriterConfig::default(),
        );
        let response = handler.handle(event_for_host("acme.app.example.com")).await;

        assert_eq!(response.status, EdgeStatus::Code(200));
        assert_eq!(decoded_body(&response), "<html><body>static</body></html>");
    }
}
