//! Generated package assets: manifest, viewer, and runtime bridge.
//!
//! Centralising every generated text here serves two purposes:
//!
//! 1. **Single source of truth** — the archive layout is a fixed contract
//!    (`imsmanifest.xml`, `index.html`, `scorm.js`, `page1.jpg` …
//!    `pageN.jpg`), and every name in that contract is defined exactly once
//!    in this module. In particular [`page_file_name`] is the one rule both
//!    the manifest builder and the archive assembler use, so the manifest
//!    can never reference a page file that the archive names differently.
//!
//! 2. **Testability** — the builders are pure functions of (identifier,
//!    title, page count), so unit tests can assert the generated text
//!    directly without rendering a single PDF page.

/// Relative path of the SCORM manifest inside the package.
pub const MANIFEST_FILE: &str = "imsmanifest.xml";

/// Relative path of the viewer document inside the package.
pub const VIEWER_FILE: &str = "index.html";

/// Relative path of the runtime-bridge script inside the package.
pub const BRIDGE_FILE: &str = "scorm.js";

/// File name for the image of a 1-based page ordinal.
///
/// Page files occupy a namespace disjoint from the generated assets above;
/// the archive assembler re-checks that invariant defensively.
pub fn page_file_name(page: usize) -> String {
    format!("page{page}.jpg")
}

// ── Manifest ─────────────────────────────────────────────────────────────

const MANIFEST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="SCORM_{{identifier}}" version="1.0"
    xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.imsproject.org/xsd/imscp_rootv1p1p2 ims_xml.xsd">
    <metadata>
        <schema>ADL SCORM</schema>
        <schemaversion>1.2</schemaversion>
    </metadata>
    <organizations default="ORG">
        <organization identifier="ORG">
            <title>{{title}}</title>
            <item identifier="ITEM_1" identifierref="RESOURCE_1">
                <title>{{title}}</title>
            </item>
        </organization>
    </organizations>
    <resources>
        <resource identifier="RESOURCE_1" type="webcontent" adlcp:scormtype="sco" href="index.html">
            <file href="index.html"/>
            <file href="scorm.js"/>
{{page_files}}
        </resource>
    </resources>
</manifest>
"#;

/// Build the SCORM 1.2 manifest.
///
/// References the viewer, the bridge, and exactly `page_count` page images,
/// one `<file>` entry per page in ascending order.
pub fn build_manifest(identifier: &str, title: &str, page_count: usize) -> String {
    let page_files = (1..=page_count)
        .map(|page| format!("            <file href=\"{}\"/>", page_file_name(page)))
        .collect::<Vec<_>>()
        .join("\n");

    MANIFEST_TEMPLATE
        .replace("{{identifier}}", identifier)
        .replace("{{title}}", &escape_xml(title))
        .replace("{{page_files}}", &page_files)
}

// ── Viewer ───────────────────────────────────────────────────────────────

const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{title}}</title>
    <script src="scorm.js"></script>
    <style>
        body { font-family: Arial, sans-serif; }
        #container { text-align: center; }
        #nav { margin: 20px; }
        #pageImage { max-width: 100%; max-height: 70vh; }
        #pageInfo { margin: 10px; }
    </style>
</head>
<body onload="init()">
    <div id="container">
        <div id="pageInfo">Page <span id="current">1</span> of <span id="total">{{page_count}}</span></div>
        <img id="pageImage" src="page1.jpg" alt="Page 1">
        <div id="nav">
            <button onclick="prevPage()">Previous</button>
            <button onclick="nextPage()">Next</button>
        </div>
    </div>
    <script>
        var currentPage = 1;
        var totalPages = {{page_count}};

        function init() {
            SCORM.init();
            // A missing or garbled bookmark must not break the viewer:
            // anything that does not parse as a page number means page 1.
            var stored = parseInt(SCORM.get("cmi.core.lesson_location"), 10);
            showPage(isNaN(stored) ? 1 : stored);
        }

        function showPage(page) {
            if (page < 1 || page > totalPages) { return; }
            currentPage = page;
            document.getElementById("pageImage").src = "page" + page + ".jpg";
            document.getElementById("pageImage").alt = "Page " + page;
            document.getElementById("current").textContent = page;
            SCORM.set("cmi.core.lesson_location", String(page));
            if (page === totalPages) {
                SCORM.set("cmi.core.lesson_status", "completed");
            }
            SCORM.commit();
        }

        function prevPage() { showPage(currentPage - 1); }
        function nextPage() { showPage(currentPage + 1); }

        window.onbeforeunload = function () { SCORM.terminate(); };
    </script>
</body>
</html>
"#;

/// Build the paginated viewer document.
///
/// `page_count` is baked in as a literal so the viewer can bound navigation
/// without asking the host runtime anything. The bridge is referenced by its
/// fixed [`BRIDGE_FILE`] name.
pub fn build_viewer(title: &str, page_count: usize) -> String {
    VIEWER_TEMPLATE
        .replace("{{title}}", &escape_xml(title))
        .replace("{{page_count}}", &page_count.to_string())
}

// ── Runtime bridge ───────────────────────────────────────────────────────

const RUNTIME_BRIDGE: &str = r#"var SCORM = {
    api: null,

    init: function () {
        this.api = this.findAPI(window);
        if (!this.api) { return false; }
        try {
            this.api.LMSInitialize("");
            return true;
        } catch (e) {
            this.api = null;
            return false;
        }
    },

    // Walk outward through the frame hierarchy looking for the LMS-provided
    // API object. The walk is bounded so a pathological parent chain cannot
    // hang the page; it stops at the outermost window (parent === self).
    findAPI: function (win) {
        var depth = 0;
        while (win && depth < 16) {
            if (win.API) { return win.API; }
            if (!win.parent || win.parent === win) { break; }
            win = win.parent;
            depth += 1;
        }
        return null;
    },

    get: function (element) {
        if (!this.api) { return null; }
        try {
            return this.api.LMSGetValue(element);
        } catch (e) {
            return null;
        }
    },

    set: function (element, value) {
        if (!this.api) { return false; }
        try {
            return this.api.LMSSetValue(element, value);
        } catch (e) {
            return false;
        }
    },

    commit: function () {
        if (!this.api) { return false; }
        try {
            return this.api.LMSCommit("");
        } catch (e) {
            return false;
        }
    },

    terminate: function () {
        if (!this.api) { return false; }
        try {
            return this.api.LMSFinish("");
        } catch (e) {
            return false;
        }
    }
};
"#;

/// The runtime-bridge script.
///
/// Wraps the SCORM 1.2 runtime API (`LMSInitialize` … `LMSFinish`). When no
/// host runtime is discoverable every operation is a no-op returning a
/// failure indicator (`false`, or `null` for reads) rather than throwing,
/// so the viewer stays usable when opened standalone.
pub fn build_runtime_bridge() -> &'static str {
    RUNTIME_BRIDGE
}

/// Escape the five XML-significant characters.
///
/// Titles come from user-supplied configuration; everything else in the
/// templates is fixed text.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
