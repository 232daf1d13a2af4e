//! URL construction for the site's `_api/web` endpoints
//!
//! Every caller path is concatenated onto the configured root relative path
//! (`server_relative_url`) as-is; no separator is inserted or removed. The
//! results are relative to the site base URL.
//!
//! Values placed inside OData string literals (`'...'`) have their single
//! quotes doubled, so names like `O'Brien.docx` address the right resource.
//! `%`, `#` and `?` inside a literal are percent-encoded; otherwise the URL
//! parser would cut the literal at a fragment or query delimiter.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use spconnector_core::domain::RecycleBinId;

/// Characters that must not appear raw inside an OData literal in a URL path
const LITERAL_ENCODE_SET: &AsciiSet = &CONTROLS.add(b'%').add(b'#').add(b'?');

/// Builds endpoint paths for one configured root
#[derive(Debug, Clone, Copy)]
pub struct Endpoints<'a> {
    root: &'a str,
}

impl<'a> Endpoints<'a> {
    /// Creates endpoint helpers for the given root relative path
    pub fn new(root: &'a str) -> Self {
        Self { root }
    }

    /// `<root><path>`
    pub fn server_relative(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    /// `<root><parent>/<name>`, or `<root><name>` without a parent
    pub fn folder_url(&self, parent: Option<&str>, name: &str) -> String {
        match parent {
            Some(parent) => format!("{}{}/{}", self.root, parent, name),
            None => format!("{}{}", self.root, name),
        }
    }

    /// `_api/web/GetFolderByServerRelativeUrl('<root><path>')`
    pub fn resource(&self, path: &str) -> String {
        format!(
            "_api/web/GetFolderByServerRelativeUrl('{}')",
            odata_literal(&self.server_relative(path))
        )
    }

    /// Folder existence check
    pub fn folder_exists(&self, path: &str) -> String {
        format!("{}/exists", self.resource(path))
    }

    /// File existence check inside a folder
    pub fn file_exists(&self, path: &str, file_name: &str) -> String {
        format!("{}/files('{}')/exists", self.resource(path), odata_literal(file_name))
    }

    /// Raw file content
    pub fn file_content(&self, path: &str, file_name: &str) -> String {
        format!("{}/files('{}')/$value", self.resource(path), odata_literal(file_name))
    }

    /// Folder collection, target of folder creation
    pub fn folders(&self) -> &'static str {
        "_api/web/folders"
    }

    /// File upload into a folder; always overwrites
    pub fn file_add(&self, path: &str, file_name: &str) -> String {
        format!(
            "{}/Files/add(overwrite=true,url='{}')",
            self.resource(path),
            odata_literal(file_name)
        )
    }

    /// A file addressed through its folder path, target of file deletion
    pub fn file_resource(&self, path: &str, file_name: &str) -> String {
        self.resource(&format!("{path}/{file_name}"))
    }

    /// Move to recycle bin
    pub fn recycle(&self, path: &str) -> String {
        format!("{}/recycle()", self.resource(path))
    }

    /// A single recycle-bin item
    pub fn recycle_bin_item(&self, id: RecycleBinId) -> String {
        format!("_api/web/recyclebin('{id}')")
    }

    /// Restore of a recycle-bin item
    pub fn recycle_bin_restore(&self, id: RecycleBinId) -> String {
        format!("{}/restore()", self.recycle_bin_item(id))
    }
}

/// Escapes a value for use inside an OData string literal
pub fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quotes a value for an OData literal and makes it safe to embed in a URL path
pub fn odata_literal(value: &str) -> String {
    utf8_percent_encode(&odata_quote(value), LITERAL_ENCODE_SET).to_string()
}
