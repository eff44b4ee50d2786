//! In-memory host document

use serde::{Deserialize, Serialize};

use super::{
    DocumentError, DocumentObject, DocumentResult, HostDocument, ObjectData, ViewStyle,
};
use crate::shape::Shape;
use crate::wall::WallEntity;

/// How duplicate object names are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamePolicy {
    /// Append a numeric suffix (`Wall`, `Wall001`, `Wall002`, ...)
    #[default]
    Rename,
    /// Refuse the duplicate
    Reject,
}

/// An in-memory document holding objects in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document name
    pub name: String,
    objects: Vec<DocumentObject>,
    #[serde(default)]
    name_policy: NamePolicy,
    #[serde(skip)]
    recompute_count: usize,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set how duplicate names are handled
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the document has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of times recompute has run
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    /// All wall objects
    pub fn walls(&self) -> impl Iterator<Item = (&str, &WallEntity)> {
        self.objects
            .iter()
            .filter_map(|o| o.as_wall().map(|w| (o.name.as_str(), w)))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    fn get_mut(&mut self, name: &str) -> DocumentResult<&mut DocumentObject> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| DocumentError::ObjectNotFound(name.to_string()))
    }

    fn assign_name(&self, requested: &str) -> DocumentResult<String> {
        if self.position(requested).is_none() {
            return Ok(requested.to_string());
        }

        match self.name_policy {
            NamePolicy::Reject => Err(DocumentError::DuplicateName(requested.to_string())),
            NamePolicy::Rename => {
                let name = (1..)
                    .map(|i| format!("{requested}{i:03}"))
                    .find(|candidate| self.position(candidate).is_none())
                    .unwrap_or_else(|| requested.to_string());
                Ok(name)
            }
        }
    }

    fn insert(&mut self, object: DocumentObject) -> String {
        let name = object.name.clone();
        tracing::debug!("Added object {}", name);
        self.objects.push(object);
        name
    }
}

impl HostDocument for Document {
    fn objects(&self) -> Box<dyn Iterator<Item = &DocumentObject> + '_> {
        Box::new(self.objects.iter())
    }

    fn object(&self, name: &str) -> Option<&DocumentObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn add_feature(&mut self, name: &str) -> DocumentResult<String> {
        let name = self.assign_name(name)?;
        Ok(self.insert(DocumentObject::feature(name)))
    }

    fn add_wall(&mut self, name: &str, wall: WallEntity) -> DocumentResult<String> {
        let name = self.assign_name(name)?;
        Ok(self.insert(DocumentObject::wall(name, wall)))
    }

    fn remove_object(&mut self, name: &str) -> DocumentResult<()> {
        let index = self
            .position(name)
            .ok_or_else(|| DocumentError::ObjectNotFound(name.to_string()))?;
        self.objects.remove(index);
        tracing::debug!("Removed object {}", name);
        Ok(())
    }

    fn set_shape(&mut self, name: &str, shape: Shape) -> DocumentResult<()> {
        let object = self.get_mut(name)?;
        match object.data_mut() {
            ObjectData::Feature { shape: current } => {
                *current = shape;
                Ok(())
            }
            ObjectData::Wall(_) => Err(DocumentError::DerivedShape(name.to_string())),
        }
    }

    fn set_style(&mut self, name: &str, style: ViewStyle) -> DocumentResult<()> {
        self.get_mut(name)?.style = style;
        Ok(())
    }

    fn wall_mut(&mut self, name: &str) -> DocumentResult<&mut WallEntity> {
        let object = self.get_mut(name)?;
        match object.data_mut() {
            ObjectData::Wall(wall) => Ok(wall),
            ObjectData::Feature { .. } => Err(DocumentError::NotAWall(name.to_string())),
        }
    }

    fn recompute(&mut self) {
        for object in &mut self.objects {
            if let ObjectData::Wall(wall) = object.data_mut() {
                wall.execute();
            }
        }
        self.recompute_count += 1;
    }
}
