use callmap_core::{EntityMapping, FunctionRecord};
use std::fs;
use tempfile::TempDir;

/// A mapping of `folder_count` folders nested up to three deep, each owning
/// `functions_per_folder` functions that call into the previous folder.
pub fn generate_synthetic_mapping(folder_count: usize, functions_per_folder: usize) -> EntityMapping {
    let mut mapping = EntityMapping::new();
    for i in 0..folder_count {
        let folder = folder_path(i);
        mapping.insert_folder(folder.clone());
        for j in 0..functions_per_folder {
            let callee = format!("fn_{}_{}", i.saturating_sub(1), j);
            let record = FunctionRecord::with_calls([callee.clone(), callee])
                .documented(generate_documentation(i, j));
            mapping.insert_function(&folder, format!("fn_{i}_{j}"), record);
        }
    }
    mapping
}

fn folder_path(index: usize) -> String {
    match index % 3 {
        0 => format!("pkg_{}", index / 9),
        1 => format!("pkg_{}/mod_{}", index / 9, index / 3),
        _ => format!("pkg_{}/mod_{}/leaf_{}", index / 9, index / 3, index),
    }
}

pub fn generate_documentation(folder: usize, function: usize) -> String {
    format!(
        r#"## Description
Handles item {function} of folder {folder}.

## Parameters
input: the request
options: tuning flags

## Return Value
The processed result.

## Pseudocode
```
read input
apply options
return result
```
"#
    )
}

/// Writes the mapping as `functions.json` into a fresh temp dir.
pub fn write_mapping(mapping: &EntityMapping) -> anyhow::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let json = serde_json::to_string(mapping)?;
    fs::write(temp_dir.path().join("functions.json"), json)?;
    Ok(temp_dir)
}
