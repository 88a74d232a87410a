use std::collections::HashMap;
use std::path::Path;

use bevy_ecs::resource::Resource;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::{debug, info, warn};

use crate::systems::objects::ObjectKind;
use crate::texture::Texture;

/// Every billboard the sprite pass can draw, named after its asset file (`<key>.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SpriteKey {
    Enemy,
    Shadow,
    Key,
    Locker,
    Note,
    Bed,
    Car,
    Weapon,
}

impl From<ObjectKind> for SpriteKey {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Key => SpriteKey::Key,
            ObjectKind::Locker => SpriteKey::Locker,
            ObjectKind::Note => SpriteKey::Note,
            ObjectKind::Bed => SpriteKey::Bed,
            ObjectKind::Car => SpriteKey::Car,
            ObjectKind::Weapon => SpriteKey::Weapon,
            ObjectKind::Shadow => SpriteKey::Shadow,
        }
    }
}

/// Loaded sprite art. Keys without an entry are drawn procedurally.
#[derive(Resource, Debug, Default, Clone)]
pub struct TextureStore {
    textures: HashMap<SpriteKey, Texture>,
}

impl TextureStore {
    /// Loads `<key>.png` for every sprite key found in `dir`.
    ///
    /// Missing or undecodable files are logged and skipped; this never fails.
    pub fn load_dir(dir: &Path) -> Self {
        let mut store = Self::default();
        for key in SpriteKey::iter() {
            let path = dir.join(format!("{}.png", key.as_ref()));
            if !path.exists() {
                debug!(key = key.as_ref(), path = %path.display(), "No texture file; using procedural sprite");
                continue;
            }
            match Texture::load(&path) {
                Ok(texture) => {
                    store.insert(key, texture);
                }
                Err(error) => warn!(key = key.as_ref(), %error, "Failed to load texture; using procedural sprite"),
            }
        }
        info!(loaded = store.textures.len(), dir = %dir.display(), "Loaded sprite textures");
        store
    }

    pub fn insert(&mut self, key: SpriteKey, texture: Texture) {
        self.textures.insert(key, texture);
    }

    pub fn get(&self, key: SpriteKey) -> Option<&Texture> {
        self.textures.get(&key)
    }
}
