//! Project export: turning a host project into the descriptor file handed to COLT.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the descriptor written into the project base directory.
pub const DESCRIPTOR_FILE_NAME: &str = "autogenerated.colt";

/// How the companion application presents the running project.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LauncherType {
    #[default]
    Browser,
    Standalone,
}

impl LauncherType {
    pub fn as_str(self) -> &'static str {
        match self {
            LauncherType::Browser => "BROWSER",
            LauncherType::Standalone => "STANDALONE",
        }
    }
}

impl Display for LauncherType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The host project being exported.
pub trait ProjectModel {
    fn base_dir(&self) -> &Path;

    fn name(&self) -> &str;
}

/// A project rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalProject {
    base_dir: PathBuf,
    name: String,
}

impl LocalProject {
    pub fn new(base_dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            name: name.into(),
        }
    }

    /// Names the project after its base directory.
    pub fn from_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let name = base_dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string());

        Self { base_dir, name }
    }
}

impl ProjectModel for LocalProject {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Everything COLT needs to open a project. Immutable once written.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub main_document: String,
    /// Where the descriptor file lives.
    pub path: PathBuf,
    pub launcher: LauncherType,
}

/// Parameters of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Overrides the project name when set.
    pub name: Option<String>,
    pub main_document: String,
    pub launcher: LauncherType,
}

impl ExportRequest {
    /// A browser export named after the project.
    pub fn new(main_document: impl Into<String>) -> Self {
        Self {
            name: None,
            main_document: main_document.into(),
            launcher: LauncherType::default(),
        }
    }
}

/// Serializes a descriptor to its file.
pub trait DescriptorWriter {
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] on any I/O or encoding failure.
    fn write_descriptor(&self, path: &Path, descriptor: &ProjectDescriptor) -> Result<()>;
}

/// Writes the `.colt` XML project format.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDescriptorWriter;

impl XmlDescriptorWriter {
    /// Renders the descriptor document. Names and paths are escaped by the XML writer.
    pub fn render(descriptor: &ProjectDescriptor) -> io::Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("xml").with_attributes([
            ("projectName", descriptor.name.as_str()),
            ("projectType", "JS"),
        ])))?;

        writer.write_event(Event::Start(BytesStart::new("build")))?;
        writer
            .create_element("main-document")
            .write_text_content(BytesText::new(&descriptor.main_document))?;
        writer.write_event(Event::End(BytesEnd::new("build")))?;

        writer.write_event(Event::Start(BytesStart::new("live")))?;
        writer.write_event(Event::Start(BytesStart::new("launch")))?;
        writer
            .create_element("launcher")
            .write_text_content(BytesText::new(descriptor.launcher.as_str()))?;
        writer.write_event(Event::End(BytesEnd::new("launch")))?;
        writer.write_event(Event::End(BytesEnd::new("live")))?;

        writer.write_event(Event::End(BytesEnd::new("xml")))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        xml.push('\n');
        Ok(xml)
    }
}

impl DescriptorWriter for XmlDescriptorWriter {
    fn write_descriptor(&self, path: &Path, descriptor: &ProjectDescriptor) -> Result<()> {
        let to_error =
            |e: io::Error| Error::serialization_error(path.to_string_lossy().to_string(), e);

        let xml = Self::render(descriptor).map_err(to_error)?;
        fs::write(path, xml).map_err(to_error)
    }
}

/// Writes `<base_dir>/autogenerated.colt` for `project` and returns the written descriptor.
///
/// The returned descriptor carries the launcher type, so callers thread it through
/// subsequent calls instead of remembering it globally.
///
/// # Errors
///
/// Any failure of `writer` is returned as is; exports are not retried.
pub fn export_project(
    project: &dyn ProjectModel,
    request: ExportRequest,
    writer: &dyn DescriptorWriter,
) -> Result<ProjectDescriptor> {
    let descriptor = ProjectDescriptor {
        name: request.name.unwrap_or_else(|| project.name().to_string()),
        main_document: request.main_document,
        path: project.base_dir().join(DESCRIPTOR_FILE_NAME),
        launcher: request.launcher,
    };

    writer.write_descriptor(&descriptor.path, &descriptor)?;
    info!(
        "Exported COLT project `{}` to `{}`",
        descriptor.name,
        descriptor.path.display()
    );

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingWriter {
        written: RefCell<Vec<(PathBuf, ProjectDescriptor)>>,
    }

    impl DescriptorWriter for RecordingWriter {
        fn write_descriptor(&self, path: &Path, descriptor: &ProjectDescriptor) -> Result<()> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), descriptor.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_export_writes_one_descriptor() {
        let project = LocalProject::new("/work/game", "game");
        let writer = RecordingWriter::default();
        let request = ExportRequest {
            name: Some("Demo".to_string()),
            main_document: "/work/game/index.html".to_string(),
            launcher: LauncherType::Standalone,
        };

        let descriptor = export_project(&project, request, &writer).unwrap();

        let written = writer.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("/work/game/autogenerated.colt"));
        assert_eq!(written[0].1, descriptor);
        assert_eq!(descriptor.name, "Demo");
        assert_eq!(descriptor.main_document, "/work/game/index.html");
        assert_eq!(descriptor.launcher, LauncherType::Standalone);
    }

    #[test]
    fn test_export_defaults_to_project_name_and_browser() {
        let project = LocalProject::new("/work/site", "site");
        let writer = RecordingWriter::default();

        let descriptor =
            export_project(&project, ExportRequest::new("index.html"), &writer).unwrap();

        assert_eq!(descriptor.name, "site");
        assert_eq!(descriptor.launcher, LauncherType::Browser);
    }

    #[test]
    fn test_local_project_from_dir() {
        let project = LocalProject::from_dir("/home/me/my-game");
        assert_eq!(project.name(), "my-game");
        assert_eq!(project.base_dir(), Path::new("/home/me/my-game"));
    }

    #[test]
    fn test_xml_render_escapes_values() {
        let descriptor = ProjectDescriptor {
            name: "Tom & \"Jerry\"".to_string(),
            main_document: "<index>.html".to_string(),
            path: PathBuf::from("autogenerated.colt"),
            launcher: LauncherType::Browser,
        };

        let xml = XmlDescriptorWriter::render(&descriptor).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("projectName=\"Tom &amp; &quot;Jerry&quot;\""));
        assert!(xml.contains("projectType=\"JS\""));
        assert!(xml.contains("<main-document>&lt;index&gt;.html</main-document>"));
        assert!(xml.contains("<launcher>BROWSER</launcher>"));
    }

    #[test]
    fn test_xml_writer_reports_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join(DESCRIPTOR_FILE_NAME);
        let descriptor = ProjectDescriptor {
            name: "p".to_string(),
            main_document: "index.html".to_string(),
            path: path.clone(),
            launcher: LauncherType::Browser,
        };

        let result = XmlDescriptorWriter.write_descriptor(&path, &descriptor);
        assert!(matches!(result, Err(Error::Serialization { .. })));
    }
}
