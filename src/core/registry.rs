// src/core/registry.rs

use crate::models::{Action, Project, ProjectLanguage, ProjectType};
use std::collections::HashMap;

/// Lookup tables over the configured projects.
///
/// Projects are indexed by name (a later project with the same name replaces the earlier
/// one), and every non-reserved executable of a native project is exposed as an example
/// target. Two projects declaring the same example name also resolve last-write-wins; the
/// collision is logged.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    by_name: HashMap<String, usize>,
    example_names: Vec<String>,
    example_owners: HashMap<String, usize>,
}

impl ProjectRegistry {
    /// Builds the registry from the configured projects, preserving their order.
    pub fn index(projects: &[Project]) -> Self {
        let projects = projects.to_vec();
        let mut by_name = HashMap::new();
        let mut example_names = Vec::new();
        let mut example_owners: HashMap<String, usize> = HashMap::new();

        for (i, project) in projects.iter().enumerate() {
            if let Some(previous) = by_name.insert(project.name.clone(), i) {
                log::debug!(
                    "Project '{}' is defined more than once; entry #{} replaces entry #{}",
                    project.name,
                    i,
                    previous
                );
            }

            if !project.is_native() {
                continue;
            }
            for exe in project.example_executables() {
                match example_owners.insert(exe.name.clone(), i) {
                    Some(previous) => {
                        let previous_name = projects.get(previous).map_or("?", |p| p.name.as_str());
                        log::warn!(
                            "Example '{}' is declared by both '{}' and '{}'; using '{}'.",
                            exe.name,
                            previous_name,
                            project.name,
                            project.name
                        );
                    }
                    None => example_names.push(exe.name.clone()),
                }
            }
        }

        Self {
            projects,
            by_name,
            example_names,
            example_owners,
        }
    }

    /// Looks a project up by name.
    pub fn get(&self, name: &str) -> Option<&Project> {
        self.by_name.get(name).and_then(|&i| self.projects.get(i))
    }

    /// Returns the project owning the example target `example`.
    pub fn example_owner(&self, example: &str) -> Option<&Project> {
        self.example_owners
            .get(example)
            .and_then(|&i| self.projects.get(i))
    }

    /// Effective projects (the winners of name collisions), in configuration order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .enumerate()
            .filter(|(i, p)| self.by_name.get(&p.name) == Some(i))
            .map(|(_, p)| p)
    }

    pub fn c_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects().filter(|p| p.language == ProjectLanguage::C)
    }

    pub fn python_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects().filter(|p| p.language == ProjectLanguage::Python)
    }

    /// Every registered example target name, in order of first declaration.
    pub fn example_names(&self) -> &[String] {
        &self.example_names
    }

    /// The names the CLI accepts for `action`:
    ///
    /// - `build`: native projects
    /// - `run`: every project
    /// - `test`: native libraries
    /// - `example`: every example target
    pub fn projects_eligible_for(&self, action: Action) -> Vec<&str> {
        match action {
            Action::Build => self.c_projects().map(|p| p.name.as_str()).collect(),
            Action::Run => self.projects().map(|p| p.name.as_str()).collect(),
            Action::Test => self
                .c_projects()
                .filter(|p| p.kind == ProjectType::Library)
                .map(|p| p.name.as_str())
                .collect(),
            Action::Example => self.example_names.iter().map(String::as_str).collect(),
        }
    }
}
