/// index.htmlテンプレートへのテナント情報注入
///
/// HTMLパーサーは使わず、リテラル文字列の置換のみで書き換える。
/// パターンが存在しない場合は何もしない（エラーにはならない）。
use crate::domain::Tenant;

/// テンプレート内のテナントキー差し込み位置を示すプレースホルダー
pub const TENANT_PLACEHOLDER: &str = "TENANT_DOMAIN";

/// 書き換え対象のマニフェスト参照属性
pub const MANIFEST_HREF: &str = r#"href="/manifest.json""#;

/// 実行成功マーカーの挿入位置となるタグ
pub const HEAD_TAG: &str = "<head>";

/// 実行成功を示す診断用コメント
pub const SUCCESS_MARKER: &str = "<!-- Funcao Lambda Executada com sucesso -->";

/// テンプレートにテナント情報を注入する
///
/// 置換は次の順序で適用される。順序は出力の互換性に関わるため変更不可。
/// 1. すべての`TENANT_DOMAIN`をテナントキーに置換
/// 2. 最初の`href="/manifest.json"`をマニフェストURLに置換
/// 3. 最初の`<head>`の直後に改行と成功マーカーを挿入
///
/// # 引数
/// * `template` - S3から取得したindex.htmlテンプレート
/// * `tenant` - テナント
/// * `manifest_url` - 構築済みのテナントマニフェストURL
pub fn rewrite_template(template: &str, tenant: &Tenant, manifest_url: &str) -> String {
    let rewritten = template.replace(TENANT_PLACEHOLDER, tenant.as_str());
    let rewritten = rewritten.replacen(MANIFEST_HREF, &format!(r#"href="{manifest_url}""#), 1);
    rewritten.replacen(HEAD_TAG, &format!("{HEAD_TAG}\n{SUCCESS_MARKER}"), 1)
}
