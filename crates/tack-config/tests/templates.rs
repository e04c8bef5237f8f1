//! Property tests for filename templates and extension resolution order.

use std::collections::HashSet;

use proptest::prelude::*;
use tack_config::{ChunkData, FilenameTemplate, ResolveOptions};

fn chunk_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z0-9]{1,8}", 2..12).prop_map(|ids| ids.into_iter().collect())
}

proptest! {
    #[test]
    fn id_templates_render_distinct_names(ids in chunk_ids(), prefix in "[a-z]{0,4}") {
        let template = FilenameTemplate::parse(&format!("{prefix}[id].chunk.js")).unwrap();
        prop_assert!(template.is_chunk_unique());

        let names: HashSet<_> = ids.iter().map(|id| template.render(&ChunkData::new(id.as_str()))).collect();
        prop_assert_eq!(names.len(), ids.len());
    }

    #[test]
    fn hash_length_truncates(len in 1usize..20, hash in "[0-9a-f]{20,40}") {
        let template = FilenameTemplate::parse(&format!("[id].[contenthash:{len}].js")).unwrap();
        let rendered = template.render(&ChunkData::new("main").with_content_hash(hash.clone()));
        prop_assert_eq!(rendered, format!("main.{}.js", &hash[..len]));
    }

    #[test]
    fn templates_without_brackets_render_verbatim(source in "[a-z./_-]{1,24}") {
        let template = FilenameTemplate::parse(&source).unwrap();
        prop_assert_eq!(template.render(&ChunkData::new("1")), source);
        prop_assert!(!template.is_chunk_unique());
    }

    #[test]
    fn candidates_preserve_extension_order(
        exts in prop::collection::vec("\\.[a-z]{1,4}", 1..6),
        request in "\\./[a-z]{1,8}",
    ) {
        let resolve = ResolveOptions::new(exts.clone());
        let candidates = resolve.candidates(&request);
        prop_assert_eq!(candidates.len(), 1 + exts.len() * 2);
        prop_assert_eq!(&candidates[0], &request);
        for (i, ext) in exts.iter().enumerate() {
            prop_assert_eq!(&candidates[1 + i], &format!("{request}{ext}"));
            prop_assert_eq!(&candidates[1 + exts.len() + i], &format!("{request}/index{ext}"));
        }
    }
}
