//! 作品カタログ
//!
//! 作品一覧と事前分析をIDで引けるようにまとめ、検索・タグ絞り込みを提供する。

use crate::error::Result;
use crate::types::{Artwork, PreAnalysis};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    artworks: Vec<Artwork>,
    analyses: HashMap<String, PreAnalysis>,
}

impl Catalog {
    pub fn new(artworks: Vec<Artwork>, analyses: Vec<PreAnalysis>) -> Self {
        let analyses = analyses
            .into_iter()
            .filter(|a| !a.id.is_empty())
            .map(|a| (a.id.clone(), a))
            .collect();
        Self { artworks, analyses }
    }

    /// JSON文字列から読み込み
    ///
    /// 事前分析は任意。壊れている場合は空として扱う。
    pub fn from_json(artworks_json: &str, analyses_json: Option<&str>) -> Result<Self> {
        let artworks: Vec<Artwork> = serde_json::from_str(artworks_json)?;
        let analyses = analyses_json
            .and_then(|json| serde_json::from_str::<Vec<PreAnalysis>>(json).ok())
            .unwrap_or_default();
        Ok(Self::new(artworks, analyses))
    }

    /// JSONファイルから読み込み（非WASM環境のみ）
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_files(
        artworks_path: &std::path::Path,
        analyses_path: Option<&std::path::Path>,
    ) -> Result<Self> {
        let artworks_json = std::fs::read_to_string(artworks_path)?;
        let analyses_json = analyses_path.and_then(|p| std::fs::read_to_string(p).ok());
        Self::from_json(&artworks_json, analyses_json.as_deref())
    }

    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    pub fn find(&self, id: &str) -> Option<&Artwork> {
        if id.is_empty() {
            return None;
        }
        self.artworks.iter().find(|a| a.id == id)
    }

    pub fn analysis_for(&self, id: &str) -> Option<&PreAnalysis> {
        self.analyses.get(id)
    }

    /// 検索語（タイトル・作者・タグの部分一致、大小無視）とタグで絞り込み
    pub fn filter(&self, query: &str, tag: &str) -> Vec<&Artwork> {
        let query = query.trim().to_lowercase();
        self.artworks
            .iter()
            .filter(|a| {
                let haystack =
                    format!("{} {} {}", a.title, a.artist, a.tags.join(" ")).to_lowercase();
                let ok_query = query.is_empty() || haystack.contains(&query);
                let ok_tag = tag.is_empty() || a.tags.iter().any(|t| t == tag);
                ok_query && ok_tag
            })
            .collect()
    }

    /// 全タグ（重複なし・ソート済み）
    pub fn tags(&self) -> Vec<String> {
        self.artworks
            .iter()
            .flat_map(|a| a.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTWORKS: &str = r#"[
        {"id": "a1", "title": "별이 빛나는 밤", "artist": "Van Gogh", "year": "1889", "tags": ["풍경", "밤"]},
        {"id": "a2", "title": "진주 귀고리를 한 소녀", "artist": "Vermeer", "year": 1665, "tags": ["초상"]},
        {"id": "a3", "title": "Water Lilies", "artist": "Monet", "year": "1906", "tags": ["풍경"]}
    ]"#;

    const ANALYSES: &str = r#"[
        {"id": "a1", "key_features": ["소용돌이치는 하늘"], "color": "파랑과 노랑"},
        {"key_features": ["id가 없는 항목"]}
    ]"#;

    fn catalog() -> Catalog {
        Catalog::from_json(ARTWORKS, Some(ANALYSES)).expect("カタログ読み込み失敗")
    }

    #[test]
    fn test_find() {
        let catalog = catalog();
        assert_eq!(catalog.find("a2").map(|a| a.year.as_str()), Some("1665"));
        assert!(catalog.find("zzz").is_none());
        assert!(catalog.find("").is_none());
    }

    #[test]
    fn test_analysis_for() {
        let catalog = catalog();
        assert_eq!(catalog.analysis_for("a1").unwrap().color, "파랑과 노랑");
        assert!(catalog.analysis_for("a2").is_none());
    }

    #[test]
    fn test_invalid_analyses_ignored() {
        let catalog = Catalog::from_json(ARTWORKS, Some("not json")).unwrap();
        assert_eq!(catalog.artworks().len(), 3);
        assert!(catalog.analysis_for("a1").is_none());
    }

    #[test]
    fn test_invalid_artworks_error() {
        assert!(Catalog::from_json("{", None).is_err());
    }

    #[test]
    fn test_filter_query_case_insensitive() {
        let catalog = catalog();
        let found = catalog.filter("monet", "");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a3");
    }

    #[test]
    fn test_filter_by_tag() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.filter("", "풍경").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
        assert_eq!(catalog.filter("van", "풍경").len(), 1);
        assert!(catalog.filter("vermeer", "풍경").is_empty());
    }

    #[test]
    fn test_tags_sorted_unique() {
        let catalog = catalog();
        assert_eq!(catalog.tags(), vec!["밤", "초상", "풍경"]);
    }

    /// 同梱のサンプルデータが読める
    #[test]
    fn test_bundled_sample_data() {
        let catalog = Catalog::from_json(
            include_str!("../../public/data/artworks.json"),
            Some(include_str!("../../public/data/analyses.json")),
        )
        .unwrap();
        assert_eq!(catalog.artworks().len(), 3);
        assert_eq!(catalog.find("starry-night").unwrap().year, "1889");
        assert!(catalog.analysis_for("the-scream").is_some());
        assert!(catalog.analysis_for("great-wave").is_none());
    }
}
