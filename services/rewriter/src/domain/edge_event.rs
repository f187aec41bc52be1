/// CloudFrontビューワーリクエストイベントのモデル
///
/// Lambda@Edgeに渡されるイベントのうち、この関数が参照する部分だけを
/// 型として表現する。未知のフィールドは無視し、`Records`が欠落していても
/// デシリアライズ自体は成功させる（欠落の扱いは呼び出し側で判断する）。
use std::collections::HashMap;

use serde::Deserialize;

/// ビューワーリクエストイベント全体
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerRequestEvent {
    /// イベントレコード一覧（この関数は先頭レコードのみ参照する）
    #[serde(rename = "Records", default)]
    pub records: Vec<EdgeRecord>,
}

/// 1レコード分のCloudFrontデータ
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub cf: CloudFrontData,
}

/// CloudFrontのリクエストコンテキスト
#[derive(Debug, Clone, Deserialize)]
pub struct CloudFrontData {
    pub request: EdgeRequest,
}

/// インターセプトされたHTTPリクエスト
///
/// ヘッダーマップのキーはCloudFrontにより小文字化されている。
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRequest {
    #[serde(default)]
    pub headers: HashMap<String, Vec<EdgeHeader>>,
}

/// ヘッダー1エントリ
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeHeader {
    /// 元のヘッダー名（CloudFrontが付与、参照しないため省略可）
    #[serde(default)]
    pub key: Option<String>,
    pub value: String,
}

impl ViewerRequestEvent {
    /// 先頭レコードのhostヘッダーの最初の値を取得する
    ///
    /// # 戻り値
    /// * `Some(&str)` - hostヘッダー値
    /// * `None` - レコードまたはhostヘッダーが存在しない
    pub fn host(&self) -> Option<&str> {
        self.records
            .first()?
            .cf
            .request
            .headers
            .get("host")?
            .first()
            .map(|header| header.value.as_str())
    }
}
