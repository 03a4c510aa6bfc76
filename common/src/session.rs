//! セッションの保存と復元
//!
//! 選択中の作品ID・観察入力・プリセットをキー・バリュー形式で保存する。
//! ブラウザでは localStorage、テストやネイティブでは MemoryStore を使う。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::types::{Artwork, Observation, Preset};

pub const KEY_SELECTED_ARTWORK: &str = "selectedArtworkId";
pub const KEY_OBSERVATION: &str = "observation";
pub const KEY_PRESET: &str = "preset";

/// 永続化先
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// メモリ上のストア
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 1人の学生の作業状態
///
/// 作品は所有せずIDで参照し、復元時にカタログで解決する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub selected_artwork_id: Option<String>,
    pub observation: Observation,
    pub preset: Preset,
}

impl Session {
    /// 選択中の作品をカタログから解決
    pub fn selected<'a>(&self, catalog: &'a Catalog) -> Option<&'a Artwork> {
        self.selected_artwork_id
            .as_deref()
            .and_then(|id| catalog.find(id))
    }

    pub fn has_selection(&self) -> bool {
        self.selected_artwork_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    /// 3キーすべてを書き込む
    ///
    /// 選択なしは空文字で保存する。
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set(
            KEY_SELECTED_ARTWORK,
            self.selected_artwork_id.as_deref().unwrap_or(""),
        )?;
        store.set(KEY_OBSERVATION, &serde_json::to_string(&self.observation)?)?;
        store.set(KEY_PRESET, self.preset.as_str())?;
        Ok(())
    }

    /// 保存値から復元
    ///
    /// 読めない値はすべてデフォルトに倒す。カタログにないIDは選択なし。
    pub fn restore<S: KeyValueStore + ?Sized>(store: &S, catalog: &Catalog) -> Self {
        let selected_artwork_id = store
            .get(KEY_SELECTED_ARTWORK)
            .ok()
            .flatten()
            .filter(|id| catalog.find(id).is_some());

        let observation = store
            .get(KEY_OBSERVATION)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<Observation>(&raw).ok())
            .unwrap_or_default();

        let preset = store
            .get(KEY_PRESET)
            .ok()
            .flatten()
            .and_then(|raw| Preset::parse(&raw))
            .unwrap_or_default();

        Self {
            selected_artwork_id,
            observation,
            preset,
        }
    }

    /// 保存済みの観察だけを読み直す
    ///
    /// 保存がなければ `Ok(None)`、壊れていればエラー。
    pub fn load_draft<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Observation>> {
        match store.get(KEY_OBSERVATION)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(Error::from),
        }
    }

    /// 3キーを削除
    pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
        for key in [KEY_SELECTED_ARTWORK, KEY_OBSERVATION, KEY_PRESET] {
            store.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let artworks = vec![
            Artwork {
                id: "starry".into(),
                title: "별이 빛나는 밤".into(),
                ..Default::default()
            },
            Artwork {
                id: "scream".into(),
                title: "절규".into(),
                ..Default::default()
            },
        ];
        Catalog::new(artworks, Vec::new())
    }

    /// 書き込みに失敗するストア
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("quota exceeded".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn test_round_trip() {
        let session = Session {
            selected_artwork_id: Some("scream".into()),
            observation: Observation {
                free: "하늘이 붉다".into(),
                mood_emotion: "불안".into(),
                ..Default::default()
            },
            preset: Preset::Detailed,
        };
        let mut store = MemoryStore::new();
        session.persist(&mut store).unwrap();
        assert_eq!(store.len(), 3);

        let restored = Session::restore(&store, &catalog());
        assert_eq!(restored, session);
        assert_eq!(restored.selected(&catalog()).unwrap().title, "절규");
    }

    #[test]
    fn test_no_selection_saved_as_empty_string() {
        let mut store = MemoryStore::new();
        Session::default().persist(&mut store).unwrap();
        assert_eq!(store.get(KEY_SELECTED_ARTWORK).unwrap().as_deref(), Some(""));

        let restored = Session::restore(&store, &catalog());
        assert_eq!(restored.selected_artwork_id, None);
        assert!(!restored.has_selection());
    }

    #[test]
    fn test_unknown_id_restores_without_selection() {
        let mut store = MemoryStore::new();
        store.set(KEY_SELECTED_ARTWORK, "deleted-artwork").unwrap();
        store.set(KEY_OBSERVATION, r#"{"free":"남은 관찰"}"#).unwrap();

        let restored = Session::restore(&store, &catalog());
        assert_eq!(restored.selected_artwork_id, None);
        assert_eq!(restored.observation.free, "남은 관찰");
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(KEY_OBSERVATION, "{not json").unwrap();
        store.set(KEY_PRESET, "ultra").unwrap();

        let restored = Session::restore(&store, &catalog());
        assert_eq!(restored.observation, Observation::default());
        assert_eq!(restored.preset, Preset::General);
    }

    #[test]
    fn test_restore_from_broken_store() {
        let restored = Session::restore(&BrokenStore, &catalog());
        assert_eq!(restored, Session::default());
    }

    #[test]
    fn test_persist_reports_storage_error() {
        let err = Session::default().persist(&mut BrokenStore).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let mut store = MemoryStore::new();
        store.set("unrelated", "keep").unwrap();
        Session::default().persist(&mut store).unwrap();
        Session::clear(&mut store).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("keep"));
    }

    #[test]
    fn test_load_draft() {
        let mut store = MemoryStore::new();
        assert!(Session::load_draft(&store).unwrap().is_none());

        store.set(KEY_OBSERVATION, r#"{"color":"노랑"}"#).unwrap();
        let draft = Session::load_draft(&store).unwrap().unwrap();
        assert_eq!(draft.color, "노랑");

        store.set(KEY_OBSERVATION, "[broken").unwrap();
        assert!(matches!(Session::load_draft(&store), Err(Error::Json(_))));
    }
}
