//! Assembles a [`Module`] from project coordinates and configured variants.
//!
//! # Examples
//!
//! ```
//! use gmm_core::{ModuleBuilder, VariantBuilder, attributes};
//!
//! let module = ModuleBuilder::new("org.example", "lib", "1.0")
//!     .created_by("maven", "3.9.6")
//!     .variant(VariantBuilder::new("apiElements").attribute(attributes::USAGE, "java-api"))
//!     .build()
//!     .unwrap();
//! assert_eq!(module.variants.len(), 1);
//! ```

use crate::attributes::Attributes;
use crate::error::Result;
use crate::model::{
    Capability, Component, Creator, Dependency, DependencyConstraint, FORMAT_VERSION, File,
    Module, Variant,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    component: Component,
    created_by: BTreeMap<String, Creator>,
    variants: Vec<VariantBuilder>,
}

impl ModuleBuilder {
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            component: Component {
                group: group.into(),
                module: module.into(),
                version: version.into(),
                attributes: Attributes::new(),
            },
            created_by: BTreeMap::new(),
            variants: Vec::new(),
        }
    }

    #[must_use]
    pub fn component_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.component.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn created_by(mut self, tool: impl Into<String>, version: impl Into<String>) -> Self {
        self.created_by.insert(
            tool.into(),
            Creator {
                version: version.into(),
                build_id: None,
            },
        );
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: VariantBuilder) -> Self {
        self.variants.push(variant);
        self
    }

    /// Builds and validates the module.
    ///
    /// # Errors
    ///
    /// Returns `GmmError::Validation` if the module has no variants,
    /// duplicate variant names, a variant without usage attribute,
    /// duplicate dependencies within a variant, or empty coordinates.
    pub fn build(self) -> Result<Module> {
        let module = Module {
            format_version: FORMAT_VERSION.to_string(),
            component: self.component,
            created_by: self.created_by,
            variants: self.variants.into_iter().map(VariantBuilder::finish).collect(),
        };
        module.validate()?;

        tracing::debug!(
            "Built module {}:{}:{} with {} variant(s)",
            module.component.group,
            module.component.module,
            module.component.version,
            module.variants.len()
        );
        Ok(module)
    }
}

#[derive(Debug, Clone)]
pub struct VariantBuilder {
    variant: Variant,
}

impl VariantBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            variant: Variant {
                name: name.into(),
                attributes: Attributes::new(),
                dependencies: Vec::new(),
                dependency_constraints: Vec::new(),
                files: Vec::new(),
                capabilities: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variant.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.variant.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn dependencies(mut self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        self.variant.dependencies.extend(dependencies);
        self
    }

    #[must_use]
    pub fn dependency_constraint(mut self, constraint: DependencyConstraint) -> Self {
        self.variant.dependency_constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn file(mut self, file: File) -> Self {
        self.variant.files.push(file);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.variant.capabilities.extend(capabilities);
        self
    }

    fn finish(self) -> Variant {
        self.variant
    }
}
