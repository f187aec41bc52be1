/// CloudFrontに返却するレスポンスのモデル
///
/// 成功時は書き換え済みHTMLをBase64で包んだ200レスポンス、失敗時は
/// 固定文言の500レスポンスを返す。ヘッダーマップのキーは小文字、
/// 各エントリの`key`には正規の表記を入れる（CloudFrontのレスポンス形式）。
use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 失敗時にクライアントへ返す固定文言
const INTERNAL_ERROR_BODY: &str = "Erro ao modificar resposta para tenant.";

/// レスポンスステータス
///
/// 成功時は数値の200、失敗時は文字列の"500"を返す（既存配信との互換のため
/// 両形式を区別して保持する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeStatus {
    Code(u16),
    Text(String),
}

/// ボディのエンコード種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
    Text,
}

/// ヘッダー1エントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeResponseHeader {
    pub key: String,
    pub value: String,
}

/// 合成されたCloudFrontレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeResponse {
    pub status: EdgeStatus,
    #[serde(rename = "statusDescription")]
    pub status_description: String,
    pub headers: BTreeMap<String, Vec<EdgeResponseHeader>>,
    pub body: String,
    #[serde(rename = "bodyEncoding")]
    pub body_encoding: BodyEncoding,
}

impl EdgeResponse {
    /// 書き換え済みHTMLの200レスポンスを構築する
    ///
    /// # 引数
    /// * `html` - 置換適用後のHTML
    /// * `last_modified` - テンプレートオブジェクトの最終更新日時
    /// * `etag` - テンプレートオブジェクトのエンティティタグ（そのまま転記）
    pub fn rewritten_html(html: &str, last_modified: &DateTime<Utc>, etag: &str) -> Self {
        let headers = BTreeMap::from([
            header_entry("Content-Type", "text/html; charset=utf-8"),
            header_entry("Last-Modified", http_date(last_modified)),
            header_entry("ETag", etag),
            header_entry("Cache-Control", "public, max-age=0, must-revalidate"),
        ]);

        Self {
            status: EdgeStatus::Code(200),
            status_description: "Ok".to_string(),
            headers,
            body: BASE64.encode(html),
            body_encoding: BodyEncoding::Base64,
        }
    }

    /// 失敗時の固定500レスポンスを構築する
    ///
    /// エラーの詳細はログにのみ残し、クライアントへは一切返さない。
    pub fn internal_error() -> Self {
        Self {
            status: EdgeStatus::Text("500".to_string()),
            status_description: "Internal Server Error".to_string(),
            headers: BTreeMap::from([header_entry("Content-Type", "text/plain")]),
            body: INTERNAL_ERROR_BODY.to_string(),
            body_encoding: BodyEncoding::Text,
        }
    }
}

/// 小文字キーと正規表記キーのヘッダーエントリを作る
fn header_entry(
    canonical: &str,
    value: impl Into<String>,
) -> (String, Vec<EdgeResponseHeader>) {
    (
        canonical.to_ascii_lowercase(),
        vec![EdgeResponseHeader {
            key: canonical.to_string(),
            value: value.into(),
        }],
    )
}

/// HTTP date形式（例: "Wed, 21 Oct 2015 07:28:00 GMT"）にフォーマットする
fn http_date(datetime: &DateTime<Utc>) -> String {
    datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
