use serde::{Deserialize, Serialize};

/// Catalog primary key shared by both entity kinds.
pub type EntityId = i64;

/// The two browsable catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Organization,
    Tool,
}

impl EntityKind {
    /// The kind on the other side of the usage relationship.
    pub fn other(&self) -> EntityKind {
        match self {
            EntityKind::Organization => EntityKind::Tool,
            EntityKind::Tool => EntityKind::Organization,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Organization => "Organization",
            EntityKind::Tool => "Tool",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Organization => "Organizations",
            EntityKind::Tool => "Tools",
        }
    }
}

/// Immutable snapshot of a catalog record.
pub trait Entity: Clone {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn name(&self) -> &str;

    /// Secondary line shown next to the name in result lists.
    fn caption(&self) -> Option<String> {
        None
    }

    /// Labelled fields shown in the detail view of a focused tab.
    fn details(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// A company in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Organization {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Organization {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Populated address parts joined with ", ", or `None` when all are empty.
    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .filter_map(|p| p.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl Entity for Organization {
    const KIND: EntityKind = EntityKind::Organization;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn caption(&self) -> Option<String> {
        self.city.clone().or_else(|| self.country.clone())
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(description) = &self.description {
            fields.push(("Description", description.clone()));
        }
        if let Some(size) = &self.size {
            fields.push(("Size", size.clone()));
        }
        if let Some(address) = self.address_line() {
            fields.push(("Address", address));
        }
        if let Some(url) = &self.url {
            fields.push(("Website", url.clone()));
        }
        fields
    }
}

/// A product organizations use (CRM, chat, analytics...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub tool_type: String,
}

impl Tool {
    pub fn new(id: EntityId, name: impl Into<String>, tool_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tool_type: tool_type.into(),
        }
    }
}

impl Entity for Tool {
    const KIND: EntityKind = EntityKind::Tool;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn caption(&self) -> Option<String> {
        if self.tool_type.is_empty() {
            None
        } else {
            Some(self.tool_type.clone())
        }
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![("Type", self.tool_type.clone())]
    }
}
