//
//  bucket-cloner
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration file I/O helpers.

use std::path::Path;

use anyhow::Result;

/// Reads the raw content of a configuration file.
pub fn read_config_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}
