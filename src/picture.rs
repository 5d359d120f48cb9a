use wasm_bindgen::JsValue;
use web_sys::{File, Url};

/// Wrap the selected file in a blob URL the tiles can use as a CSS
/// background. The caller owns the URL and must revoke it on replace.
pub(crate) fn create_object_url(file: &File) -> Result<String, JsValue> {
    Url::create_object_url_with_blob(file)
}

/// Blob URLs pin the file in memory until released.
pub(crate) fn revoke_object_url(url: &str) {
    let _ = Url::revoke_object_url(url);
}
