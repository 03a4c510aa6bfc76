//! localStorage によるセッション保存

use art_observe_common::{Error, KeyValueStore, Result};
use gloo::storage::{LocalStorage, Storage};

/// ブラウザの localStorage
///
/// プライベートモード等で使えない場合は各操作がエラーになる。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

fn raw() -> Result<web_sys::Storage> {
    // raw() は取得失敗時に panic するため先に確認する
    let window = web_sys::window().ok_or_else(|| Error::Storage("no window".into()))?;
    match window.local_storage() {
        Ok(Some(_)) => Ok(LocalStorage::raw()),
        _ => Err(Error::Storage("localStorage unavailable".into())),
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> Error {
    Error::Storage(format!("{:?}", e))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        raw()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        raw()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        raw()?.remove_item(key).map_err(js_error)
    }
}
