use crate::pbx::errors::MutateError;
use crate::pbx::locator::Span;
use crate::splice::Insertion;

/// Map a file name to its pbxproj `lastKnownFileType` attribute.
pub fn last_known_file_type(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
    match ext {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "h" => "sourcecode.c.h",
        "c" => "sourcecode.c.c",
        "cpp" | "cc" => "sourcecode.cpp.cpp",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "plist" => "text.plist.xml",
        "json" => "text.json",
        "png" => "image.png",
        _ => "text",
    }
}

/// PBXFileReference entry declaring the file to the project.
pub fn file_reference_entry(id: &str, file_name: &str) -> String {
    let file_type = last_known_file_type(file_name);
    format!(
        "\t\t{id} /* {file_name} */ = {{isa = PBXFileReference; \
         lastKnownFileType = {file_type}; path = {file_name}; \
         sourceTree = \"<group>\"; }};\n"
    )
}

/// PBXBuildFile entry linking the file reference into one target's build.
pub fn build_file_entry(id: &str, file_ref_id: &str, file_name: &str) -> String {
    format!(
        "\t\t{id} /* {file_name} in Sources */ = {{isa = PBXBuildFile; \
         fileRef = {file_ref_id} /* {file_name} */; }};\n"
    )
}

/// Element for a group's children list.
pub fn child_element(file_ref_id: &str, file_name: &str) -> String {
    format!("\t\t\t\t{file_ref_id} /* {file_name} */,\n")
}

/// Element for a Sources build phase's files list.
pub fn phase_element(build_file_id: &str, file_name: &str) -> String {
    format!("\t\t\t\t{build_file_id} /* {file_name} in Sources */,\n")
}

/// Append an entry to a section, after the last `;`-terminated record.
///
/// The insertion point is the start of the line following the last `;` in
/// the section interior, which places the new entry between the final
/// existing record and the end marker. Empty section fallback: the line
/// after the begin marker.
pub fn insert_entry(document: &str, section: Span, entry: &str) -> Result<String, MutateError> {
    let at = append_point(document, section, ';');
    Ok(Insertion::new(at, entry).apply(document)?)
}

/// Append an element to a delimited list, after the last `,`-terminated one.
///
/// Same policy as [`insert_entry`] with `,` as the record terminator. Empty
/// list fallback: immediately after the list-open token's line.
pub fn insert_list_element(document: &str, list: Span, element: &str) -> Result<String, MutateError> {
    let at = append_point(document, list, ',');
    Ok(Insertion::new(at, element).apply(document)?)
}

/// Compute the append-after-last-terminator offset for a region.
fn append_point(document: &str, region: Span, terminator: char) -> usize {
    let interior = region.slice(document);
    match interior.rfind(terminator) {
        Some(term) => {
            let after = term + terminator.len_utf8();
            match interior[after..].find('\n') {
                Some(nl) => region.start + after + nl + 1,
                None => region.start + after,
            }
        }
        // No records yet: insert at the start of the first full line.
        None => match interior.find('\n') {
            Some(nl) => region.start + nl + 1,
            None => region.start,
        },
    }
}
