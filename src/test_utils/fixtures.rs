//! In-memory fixtures: catalog pages and driver archives.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Builder for a page shaped like the Chrome for Testing dashboard.
#[derive(Debug, Default, Clone)]
pub struct CatalogPage {
    sections: Vec<String>,
}

impl CatalogPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `<section id="{id}">` with `version` and one `status-ok` row per
    /// `(kind, platform, url)`.
    pub fn channel(mut self, id: &str, version: &str, downloads: &[(&str, &str, &str)]) -> Self {
        let rows: String = downloads
            .iter()
            .map(|(kind, platform, url)| {
                format!(
                    "<tr class=\"status-ok\"><th><code>{kind}</code></th><th><code>{platform}</code></th>\
                     <td><code>{url}</code></td><td><code>200</code></td></tr>\n"
                )
            })
            .collect();

        self.sections.push(format!(
            "<section id=\"{id}\">\n<h2>{id}</h2>\n<p>Version: <code>{version}</code> (r1234)</p>\n\
             <table>\n<thead><tr><th>Binary</th><th>Platform</th><th>URL</th><th>HTTP status</th></tr></thead>\n\
             <tbody>\n{rows}</tbody>\n</table>\n</section>\n"
        ));
        self
    }

    /// Append arbitrary markup.
    pub fn raw(mut self, markup: &str) -> Self {
        self.sections.push(markup.to_string());
        self
    }

    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>Chrome for Testing availability</title></head>\n\
             <body>\n{}</body>\n</html>\n",
            self.sections.concat()
        )
    }
}

/// Zip archive containing `entries` as `(name, contents)`.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        for (name, data) in entries {
            writer.start_file(*name, options).expect("start zip entry");
            writer.write_all(data).expect("write zip entry");
        }
        writer.finish().expect("finish zip");
    }
    cursor.into_inner()
}

/// Archive laid out like a Chrome for Testing driver release for `platform`.
pub fn driver_archive(platform: &str, binary: &[u8]) -> Vec<u8> {
    let exe = if platform.starts_with("win") { "chromedriver.exe" } else { "chromedriver" };
    let dir = format!("chromedriver-{platform}");
    let exe_entry = format!("{dir}/{exe}");
    let license_entry = format!("{dir}/LICENSE.chromedriver");
    zip_bytes(&[(exe_entry.as_str(), binary), (license_entry.as_str(), b"BSD-3-Clause".as_slice())])
}
