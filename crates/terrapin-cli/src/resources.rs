//! Static descriptor table behind the per-resource commands.

use crate::client::{CliError, CliResult};

/// One list column: header label and the record key it is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Column {
    pub(crate) header: &'static str,
    pub(crate) key: &'static str,
}

const fn column(header: &'static str, key: &'static str) -> Column {
    Column { header, key }
}

/// How a service resource maps onto API paths and list columns.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ResourceDescriptor {
    /// Singular name used on the command line.
    pub(crate) name: &'static str,
    /// Collection path; `:parent` is replaced by the `--parent` value.
    pub(crate) collection: &'static str,
    /// Member path; `:id` is replaced by the resource identifier.
    pub(crate) member: &'static str,
    /// Name of the parent resource when the collection is nested.
    pub(crate) parent: Option<&'static str>,
    pub(crate) deletable: bool,
    pub(crate) columns: &'static [Column],
}

pub(crate) const ORGANIZATION: ResourceDescriptor = ResourceDescriptor {
    name: "organization",
    collection: "organizations",
    member: "organizations/:id",
    parent: None,
    deletable: true,
    columns: &[
        column("ID", "ID"),
        column("EMAIL", "email"),
        column("CREATED", "created-at"),
    ],
};

pub(crate) const WORKSPACE: ResourceDescriptor = ResourceDescriptor {
    name: "workspace",
    collection: "organizations/:parent/workspaces",
    member: "workspaces/:id",
    parent: Some("organization"),
    deletable: true,
    columns: &[
        column("ID", "ID"),
        column("NAME", "name"),
        column("TERRAFORM VERSION", "terraform-version"),
        column("UPDATED", "updated-at"),
    ],
};

pub(crate) const SUBSCRIPTION: ResourceDescriptor = ResourceDescriptor {
    name: "subscription",
    collection: "organizations/:parent/subscription",
    member: "subscriptions/:id",
    parent: Some("organization"),
    deletable: false,
    columns: &[
        column("ID", "ID"),
        column("ACTIVE", "is-active"),
        column("START", "start-at"),
        column("END", "end-at"),
    ],
};

pub(crate) const RUN: ResourceDescriptor = ResourceDescriptor {
    name: "run",
    collection: "workspaces/:parent/runs",
    member: "runs/:id",
    parent: Some("workspace"),
    deletable: false,
    columns: &[
        column("ID", "ID"),
        column("STATUS", "status"),
        column("MESSAGE", "message"),
        column("CREATED", "created-at"),
    ],
};

pub(crate) const PROJECT: ResourceDescriptor = ResourceDescriptor {
    name: "project",
    collection: "organizations/:parent/projects",
    member: "projects/:id",
    parent: Some("organization"),
    deletable: true,
    columns: &[
        column("ID", "ID"),
        column("NAME", "name"),
        column("DESCRIPTION", "description"),
    ],
};

impl ResourceDescriptor {
    /// Path of the resource identified by `id`.
    pub(crate) fn member_path(&self, id: &str) -> CliResult<String> {
        validate_identifier(self.name, id)?;
        Ok(self.member.replace(":id", id.trim()))
    }

    /// Path of the collection, nested under `parent` when the resource requires one.
    pub(crate) fn collection_path(&self, parent: Option<&str>) -> CliResult<String> {
        match (self.parent, parent) {
            (Some(label), Some(parent)) => {
                validate_identifier(label, parent)?;
                Ok(self.collection.replace(":parent", parent.trim()))
            }
            (Some(label), None) => Err(CliError::validation(format!(
                "listing {}s requires --parent <{label}>",
                self.name
            ))),
            (None, Some(_)) => Err(CliError::validation(format!(
                "{} list does not take --parent",
                self.name
            ))),
            (None, None) => Ok(self.collection.to_string()),
        }
    }

    pub(crate) fn ensure_deletable(&self) -> CliResult<()> {
        if self.deletable {
            Ok(())
        } else {
            Err(CliError::validation(format!(
                "{} resources cannot be deleted",
                self.name
            )))
        }
    }
}

fn validate_identifier(label: &str, value: &str) -> CliResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CliError::validation(format!("{label} id must not be empty")));
    }
    if value
        .chars()
        .any(|ch| matches!(ch, '/' | '?' | '#') || ch.is_whitespace())
    {
        return Err(CliError::validation(format!(
            "{label} id '{value}' contains characters not allowed in a path segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_path_substitutes_identifier() -> CliResult<()> {
        assert_eq!(SUBSCRIPTION.member_path("sub-1")?, "subscriptions/sub-1");
        assert_eq!(WORKSPACE.member_path(" ws-123 ")?, "workspaces/ws-123");
        Ok(())
    }

    #[test]
    fn member_path_rejects_path_characters() {
        for id in ["", "  ", "ws/1", "ws?x", "ws#1", "ws 1"] {
            let err = WORKSPACE.member_path(id).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{id:?}");
        }
    }

    #[test]
    fn nested_collections_require_parent() -> CliResult<()> {
        assert_eq!(
            RUN.collection_path(Some("ws-abc"))?,
            "workspaces/ws-abc/runs"
        );
        let err = RUN.collection_path(None).unwrap_err();
        assert_eq!(
            err.display_message(),
            "listing runs requires --parent <workspace>"
        );
        Ok(())
    }

    #[test]
    fn top_level_collections_reject_parent() -> CliResult<()> {
        assert_eq!(ORGANIZATION.collection_path(None)?, "organizations");
        assert!(ORGANIZATION.collection_path(Some("acme")).is_err());
        Ok(())
    }

    #[test]
    fn deletability_follows_descriptor() {
        assert!(PROJECT.ensure_deletable().is_ok());
        assert!(RUN.ensure_deletable().is_err());
    }

    #[test]
    fn every_descriptor_lists_the_identifier_first() {
        for descriptor in [&ORGANIZATION, &WORKSPACE, &SUBSCRIPTION, &RUN, &PROJECT] {
            assert_eq!(descriptor.columns[0], column("ID", "ID"), "{}", descriptor.name);
        }
    }
}
