//! pom.xml parser for the subset needed to describe a published module.
//!
//! Uses the quick-xml SAX reader and tracks the path of open elements, so a
//! `<dependency>` inside `<build><plugins>` is never mistaken for a project
//! dependency. Namespaces are ignored; only local names are compared.

use crate::error::{MavenError, Result};
use crate::marker;
use crate::types::{
    CapabilityConfig, DEFAULT_PACKAGING, DEFAULT_TYPE, Exclusion, MavenDependency, MavenProject,
    MavenScope, ParentRef,
};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesText, Event};

/// artifactId of the plugin whose `<configuration>` is read.
pub const PLUGIN_ARTIFACT_ID: &str = "gradle-module-metadata-maven-plugin";

/// List a `<dependency>` element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepTarget {
    Project,
    Managed,
    Platform,
    Removed,
}

fn dep_target(path: &[&str]) -> Option<DepTarget> {
    match path {
        ["project", "dependencies", "dependency"] => Some(DepTarget::Project),
        ["project", "dependencyManagement", "dependencies", "dependency"] => {
            Some(DepTarget::Managed)
        }
        [
            "project",
            "build",
            "plugins",
            "plugin",
            "configuration",
            list,
            "dependency",
        ] => match *list {
            "platformDependencies" => Some(DepTarget::Platform),
            "removedDependencies" => Some(DepTarget::Removed),
            _ => None,
        },
        _ => None,
    }
}

fn is_plugin(path: &[&str]) -> bool {
    matches!(path, ["project", "build", "plugins", "plugin"])
}

fn is_capability(path: &[&str]) -> bool {
    matches!(
        path,
        [
            "project",
            "build",
            "plugins",
            "plugin",
            "configuration",
            "capabilities",
            "capability"
        ]
    )
}

/// `path` ends in `<exclusions><exclusion>` directly below a dependency.
fn is_exclusion(path: &[&str]) -> bool {
    match path {
        [head @ .., "exclusions", "exclusion"] => dep_target(head).is_some(),
        _ => false,
    }
}

/// Accumulator for a single dependency being parsed.
#[derive(Default)]
struct DepAccum {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
    dep_type: Option<String>,
    classifier: Option<String>,
    optional: Option<String>,
    exclusions: Vec<Exclusion>,
}

#[derive(Default)]
struct ExclusionAccum {
    group_id: Option<String>,
    artifact_id: Option<String>,
}

#[derive(Default)]
struct CapabilityAccum {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

#[derive(Default)]
struct PluginAccum {
    artifact_id: Option<String>,
    platform_dependencies: Vec<MavenDependency>,
    capabilities: Vec<CapabilityConfig>,
    removed_dependencies: Vec<MavenDependency>,
}

#[derive(Default)]
struct PomReader {
    project: MavenProject,
    saw_project: bool,
    stack: Vec<String>,
    text: String,
    dep: Option<(DepTarget, DepAccum)>,
    exclusion: Option<ExclusionAccum>,
    capability: Option<CapabilityAccum>,
    plugin: Option<PluginAccum>,
}

impl PomReader {
    fn start(&mut self, name: String) -> Result<()> {
        if self.stack.is_empty() && name != "project" {
            return Err(MavenError::parse(format!(
                "root element is <{name}>, expected <project>"
            )));
        }
        self.stack.push(name);
        self.text.clear();

        let stack = std::mem::take(&mut self.stack);
        let path: Vec<&str> = stack.iter().map(String::as_str).collect();

        if path == ["project"] {
            self.saw_project = true;
        } else if let Some(target) = dep_target(&path) {
            self.dep = Some((target, DepAccum::default()));
        } else if is_exclusion(&path) {
            self.exclusion = Some(ExclusionAccum::default());
        } else if is_plugin(&path) {
            self.plugin = Some(PluginAccum::default());
        } else if is_capability(&path) {
            self.capability = Some(CapabilityAccum::default());
        }

        self.stack = stack;
        Ok(())
    }

    fn end(&mut self) {
        let text = std::mem::take(&mut self.text).trim().to_string();
        let mut stack = std::mem::take(&mut self.stack);
        let path: Vec<&str> = stack.iter().map(String::as_str).collect();

        match path.as_slice() {
            ["project", field] => self.project_field(field, text),
            ["project", "parent", field] => self.parent_field(field, text),
            ["project", "properties", key] => {
                self.project.properties.insert((*key).to_string(), text);
            }
            p if dep_target(p).is_some() => self.finish_dependency(),
            [head @ .., field] if dep_target(head).is_some() => self.dependency_field(field, text),
            p if is_exclusion(p) => self.finish_exclusion(),
            [head @ .., field] if is_exclusion(head) => {
                if let Some(exclusion) = self.exclusion.as_mut() {
                    match *field {
                        "groupId" => exclusion.group_id = Some(text),
                        "artifactId" => exclusion.artifact_id = Some(text),
                        _ => {}
                    }
                }
            }
            p if is_plugin(p) => self.finish_plugin(),
            ["project", "build", "plugins", "plugin", "artifactId"] => {
                if let Some(plugin) = self.plugin.as_mut() {
                    plugin.artifact_id = Some(text);
                }
            }
            p if is_capability(p) => self.finish_capability(),
            [head @ .., field] if is_capability(head) => {
                if let Some(capability) = self.capability.as_mut() {
                    match *field {
                        "groupId" => capability.group_id = Some(text),
                        "artifactId" => capability.artifact_id = Some(text),
                        "version" => capability.version = Some(text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }

        drop(path);
        stack.pop();
        self.stack = stack;
    }

    fn project_field(&mut self, field: &str, text: String) {
        match field {
            "groupId" => self.project.group_id = Some(text),
            "artifactId" => self.project.artifact_id = Some(text),
            "version" => self.project.version = Some(text),
            "packaging" => self.project.packaging = text,
            _ => {}
        }
    }

    fn parent_field(&mut self, field: &str, text: String) {
        let parent = self.project.parent.get_or_insert_with(ParentRef::default);
        match field {
            "groupId" => parent.group_id = Some(text),
            "artifactId" => parent.artifact_id = Some(text),
            "version" => parent.version = Some(text),
            "relativePath" => parent.relative_path = Some(text),
            _ => {}
        }
    }

    fn dependency_field(&mut self, field: &str, text: String) {
        let Some((_, dep)) = self.dep.as_mut() else {
            return;
        };
        match field {
            "groupId" => dep.group_id = Some(text),
            "artifactId" => dep.artifact_id = Some(text),
            "version" => dep.version = Some(text),
            "scope" => dep.scope = Some(text),
            "type" => dep.dep_type = Some(text),
            "classifier" => dep.classifier = Some(text),
            "optional" => dep.optional = Some(text),
            _ => {}
        }
    }

    fn finish_exclusion(&mut self) {
        let Some(exclusion) = self.exclusion.take() else {
            return;
        };
        if let (Some(group_id), Some(artifact_id), Some((_, dep))) =
            (exclusion.group_id, exclusion.artifact_id, self.dep.as_mut())
        {
            dep.exclusions.push(Exclusion {
                group_id,
                artifact_id,
            });
        } else {
            tracing::warn!("Ignoring <exclusion> without groupId or artifactId");
        }
    }

    fn finish_dependency(&mut self) {
        let Some((target, dep)) = self.dep.take() else {
            return;
        };
        let Some(dep) = finalize_dep(dep) else {
            tracing::warn!("Ignoring <dependency> without groupId or artifactId");
            return;
        };

        match target {
            DepTarget::Project => self.project.dependencies.push(dep),
            DepTarget::Managed => self.project.dependency_management.push(dep),
            DepTarget::Platform => {
                if let Some(plugin) = self.plugin.as_mut() {
                    plugin.platform_dependencies.push(dep);
                }
            }
            DepTarget::Removed => {
                if let Some(plugin) = self.plugin.as_mut() {
                    plugin.removed_dependencies.push(dep);
                }
            }
        }
    }

    fn finish_capability(&mut self) {
        let Some(capability) = self.capability.take() else {
            return;
        };
        let (Some(group_id), Some(artifact_id)) = (capability.group_id, capability.artifact_id)
        else {
            tracing::warn!("Ignoring <capability> without groupId or artifactId");
            return;
        };
        if let Some(plugin) = self.plugin.as_mut() {
            plugin.capabilities.push(CapabilityConfig {
                group_id,
                artifact_id,
                version: capability.version.filter(|v| !v.is_empty()),
            });
        }
    }

    fn finish_plugin(&mut self) {
        let Some(plugin) = self.plugin.take() else {
            return;
        };
        if plugin.artifact_id.as_deref() != Some(PLUGIN_ARTIFACT_ID) {
            return;
        }
        tracing::debug!(
            "Read {} configuration: {} platform dependencies, {} capabilities, {} removed dependencies",
            PLUGIN_ARTIFACT_ID,
            plugin.platform_dependencies.len(),
            plugin.capabilities.len(),
            plugin.removed_dependencies.len()
        );
        let config = &mut self.project.plugin_config;
        config.platform_dependencies = plugin.platform_dependencies;
        config.capabilities = plugin.capabilities;
        config.removed_dependencies = plugin.removed_dependencies;
    }
}

fn finalize_dep(dep: DepAccum) -> Option<MavenDependency> {
    let group_id = dep.group_id.filter(|g| !g.is_empty())?;
    let artifact_id = dep.artifact_id.filter(|a| !a.is_empty())?;

    Some(MavenDependency {
        group_id,
        artifact_id,
        version: dep.version.filter(|v| !v.is_empty()),
        scope: dep
            .scope
            .filter(|s| !s.is_empty())
            .map(|s| {
                let scope = s.parse::<MavenScope>().unwrap_or_default();
                if let MavenScope::Other(name) = &scope {
                    tracing::warn!("Unknown dependency scope '{}'", name);
                }
                scope
            }),
        dep_type: dep
            .dep_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        classifier: dep.classifier.filter(|c| !c.is_empty()),
        optional: dep
            .optional
            .is_some_and(|o| o.trim().eq_ignore_ascii_case("true")),
        exclusions: dep.exclusions,
    })
}

fn decode_text(e: &BytesText<'_>) -> String {
    match e.decode() {
        Ok(cow) => cow.into_owned(),
        Err(_) => String::from_utf8_lossy(e.as_ref()).to_string(),
    }
}

/// Resolves `&name;` and `&#N;` references; unknown entities are kept verbatim.
fn resolve_reference(e: &BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = e.resolve_char_ref() {
        return ch.to_string();
    }
    let name = match e.decode() {
        Ok(cow) => cow.into_owned(),
        Err(_) => String::from_utf8_lossy(e).to_string(),
    };
    match quick_xml::escape::resolve_predefined_entity(&name) {
        Some(value) => value.to_string(),
        None => {
            tracing::warn!("Unknown entity reference &{};", name);
            format!("&{name};")
        }
    }
}

/// Parses pom.xml text into a [`MavenProject`].
///
/// Nothing is inherited or interpolated here; see
/// [`crate::effective::load_effective_project`] for that.
pub fn parse_pom_xml(content: &str) -> Result<MavenProject> {
    // text is trimmed per element in `end`, so whitespace next to references survives
    let mut reader = Reader::from_str(content);

    let mut pom = PomReader::default();

    loop {
        let pos = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| MavenError::parse(format!("{e} (near byte {pos})")))?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                pom.start(tag)?;
            }
            Event::Empty(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                pom.start(tag)?;
                pom.end();
            }
            Event::Text(ref e) => {
                if !pom.stack.is_empty() {
                    pom.text.push_str(&decode_text(e));
                }
            }
            Event::GeneralRef(ref e) => {
                if !pom.stack.is_empty() {
                    pom.text.push_str(&resolve_reference(e));
                }
            }
            Event::CData(ref e) => {
                if !pom.stack.is_empty() {
                    pom.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => pom.end(),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = pom.stack.last() {
        return Err(MavenError::parse(format!(
            "unexpected end of document inside <{open}>"
        )));
    }
    if !pom.saw_project {
        return Err(MavenError::parse("no <project> element found"));
    }

    let mut project = pom.project;
    if project.packaging.is_empty() {
        project.packaging = DEFAULT_PACKAGING.to_string();
    }
    project.has_marker = marker::has_marker(content);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pom() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.example</groupId>
  <artifactId>example</artifactId>
  <version>0.1</version>
  <dependencies>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>3.14.0</version>
    </dependency>
  </dependencies>
</project>"#;

        let project = parse_pom_xml(xml).unwrap();
        assert_eq!(project.group_id.as_deref(), Some("org.example"));
        assert_eq!(project.artifact_id.as_deref(), Some("example"));
        assert_eq!(project.version.as_deref(), Some("0.1"));
        assert_eq!(project.packaging, "jar");
        assert_eq!(project.dependencies.len(), 1);
        let dep = &project.dependencies[0];
        assert_eq!(dep.name(), "org.apache.commons:commons-lang3");
        assert_eq!(dep.version.as_deref(), Some("3.14.0"));
        assert!(dep.scope.is_none());
        assert_eq!(dep.dep_type, "jar");
        assert!(!project.has_marker);
    }

    #[test]
    fn test_parse_dependency_details() {
        let xml = r"<project>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>natives</artifactId>
      <version>1.0</version>
      <type>zip</type>
      <classifier>linux</classifier>
      <scope>runtime</scope>
      <optional>true</optional>
      <exclusions>
        <exclusion>
          <groupId>org.slf4j</groupId>
          <artifactId>*</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        let dep = &project.dependencies[0];
        assert_eq!(dep.dep_type, "zip");
        assert_eq!(dep.classifier.as_deref(), Some("linux"));
        assert_eq!(dep.scope, Some(MavenScope::Runtime));
        assert!(dep.optional);
        assert_eq!(
            dep.exclusions,
            vec![Exclusion {
                group_id: "org.slf4j".into(),
                artifact_id: "*".into(),
            }]
        );
    }

    #[test]
    fn test_parse_dependency_management_kept_separately() {
        let xml = r"<project>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-dependencies</artifactId>
        <version>3.2.0</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert!(project.dependencies.is_empty());
        assert_eq!(project.dependency_management.len(), 1);
        assert_eq!(
            project.dependency_management[0].scope,
            Some(MavenScope::Import)
        );
    }

    #[test]
    fn test_plugin_dependencies_are_not_project_dependencies() {
        let xml = r"<project>
  <build>
    <plugins>
      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-compiler-plugin</artifactId>
        <dependencies>
          <dependency>
            <groupId>org.ow2.asm</groupId>
            <artifactId>asm</artifactId>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
  <profiles>
    <profile>
      <dependencies>
        <dependency>
          <groupId>a</groupId>
          <artifactId>b</artifactId>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert!(project.dependencies.is_empty());
        assert!(project.plugin_config.is_empty());
    }

    #[test]
    fn test_parse_plugin_configuration() {
        let xml = r"<project>
  <build>
    <plugins>
      <plugin>
        <groupId>org.gradlex</groupId>
        <artifactId>gradle-module-metadata-maven-plugin</artifactId>
        <version>1.0</version>
        <configuration>
          <platformDependencies>
            <dependency>
              <groupId>com.fasterxml.jackson</groupId>
              <artifactId>jackson-bom</artifactId>
              <version>2.10.2</version>
            </dependency>
          </platformDependencies>
          <capabilities>
            <capability>
              <groupId>org.example</groupId>
              <artifactId>other</artifactId>
            </capability>
            <capability>
              <groupId>org.foo</groupId>
              <artifactId>another</artifactId>
              <version>0.1.2</version>
            </capability>
          </capabilities>
          <removedDependencies>
            <dependency>
              <groupId>org.shaded</groupId>
              <artifactId>lib</artifactId>
            </dependency>
          </removedDependencies>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        let config = &project.plugin_config;
        assert_eq!(config.platform_dependencies.len(), 1);
        assert_eq!(
            config.platform_dependencies[0].name(),
            "com.fasterxml.jackson:jackson-bom"
        );
        assert_eq!(config.capabilities.len(), 2);
        assert!(config.capabilities[0].version.is_none());
        assert_eq!(config.capabilities[1].version.as_deref(), Some("0.1.2"));
        assert_eq!(config.removed_dependencies[0].name(), "org.shaded:lib");
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_other_plugin_configuration_ignored() {
        let xml = r"<project>
  <build>
    <plugins>
      <plugin>
        <artifactId>some-other-plugin</artifactId>
        <configuration>
          <capabilities>
            <capability>
              <groupId>x</groupId>
              <artifactId>y</artifactId>
            </capability>
          </capabilities>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert!(project.plugin_config.is_empty());
    }

    #[test]
    fn test_parse_parent_and_properties() {
        let xml = r"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
    <relativePath/>
  </parent>
  <artifactId>child</artifactId>
  <properties>
    <java.version>17</java.version>
    <slf4j.version>2.0.9</slf4j.version>
  </properties>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        let parent = project.parent.as_ref().unwrap();
        assert_eq!(parent.artifact_id.as_deref(), Some("parent"));
        assert_eq!(parent.relative_path.as_deref(), Some(""));
        assert!(project.group_id.is_none());
        assert_eq!(
            project.properties.get("slf4j.version"),
            Some(&"2.0.9".to_string())
        );
    }

    #[test]
    fn test_parse_property_version_kept_verbatim() {
        let xml = r"<project>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>${slf4j.version}</version>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert_eq!(
            project.dependencies[0].version.as_deref(),
            Some("${slf4j.version}")
        );
    }

    #[test]
    fn test_parse_with_namespaces_and_marker() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion> <!-- do_not_remove: published-with-gradle-metadata -->
  <packaging>pom</packaging>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
    </dependency>
  </dependencies>
</project>"#;

        let project = parse_pom_xml(xml).unwrap();
        assert_eq!(project.dependencies.len(), 1);
        assert!(project.has_marker);
        assert!(project.is_pom_packaging());
    }

    #[test]
    fn test_dependency_without_artifact_id_is_skipped() {
        let xml = r"<project>
  <dependencies>
    <dependency>
      <groupId>a</groupId>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_parse_escaped_text() {
        let xml = r"<project>
  <properties>
    <note>a &amp; b</note>
  </properties>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert_eq!(project.properties["note"], "a & b");
    }

    #[test]
    fn test_parse_references_and_cdata() {
        let xml = r"<project>
  <groupId>org&amp;x</groupId>
  <artifactId>lib&#45;&#x41;</artifactId>
  <properties>
    <quoted>&quot;&lt;v&gt;&apos;</quoted>
    <raw><![CDATA[1 < 2 & 3]]></raw>
    <unknown>&custom;</unknown>
  </properties>
</project>";

        let project = parse_pom_xml(xml).unwrap();
        assert_eq!(project.group_id.as_deref(), Some("org&x"));
        assert_eq!(project.artifact_id.as_deref(), Some("lib-A"));
        assert_eq!(project.properties["quoted"], "\"<v>'");
        assert_eq!(project.properties["raw"], "1 < 2 & 3");
        assert_eq!(project.properties["unknown"], "&custom;");
    }

    #[test]
    fn test_parse_invalid_xml() {
        let xml = r#"<project attr="unclosed></project>"#;
        assert!(matches!(
            parse_pom_xml(xml),
            Err(MavenError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_truncated_document() {
        let xml = "<project><dependencies><dependency>";
        assert!(parse_pom_xml(xml).is_err());
    }

    #[test]
    fn test_parse_wrong_root() {
        let err = parse_pom_xml("<settings></settings>").unwrap_err();
        assert!(err.to_string().contains("expected <project>"));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_pom_xml("").is_err());
    }
}
