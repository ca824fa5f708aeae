use crate::error::{ProfileError, Result};
use crate::models::profile::new_id;
use crate::models::{Profile, ProfileId};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// The live profile store an import merges into
///
/// Mutations stay in a working copy until `persist` succeeds; `discard`
/// drops them.
pub trait ProfileStore {
    fn active_profile(&self) -> Result<Profile>;

    /// Every stored profile, in storage order
    fn profiles(&self) -> Result<Vec<Profile>>;

    /// Store `data` as a new profile under a fresh id
    fn create_profile(&mut self, data: Profile) -> Result<ProfileId>;

    /// Replace the stored profile with the same id
    fn update_profile(&mut self, profile: Profile) -> Result<()>;

    fn set_active(&mut self, id: &str) -> Result<()>;

    /// Write the working copy out; `Ok(false)` means nothing was saved
    fn persist(&mut self) -> Result<bool>;

    fn discard(&mut self) -> Result<()>;
}

/// SQLite-backed profile store keeping each profile as a JSON document
pub struct SqliteProfileStore {
    conn: Connection,
    db_path: PathBuf,
    profiles: Vec<Profile>,
    active_id: ProfileId,
}

impl SqliteProfileStore {
    pub const DEFAULT_PROFILE_NAME: &'static str = "Default";

    pub fn init_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    pub fn init(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, db_path.to_path_buf())
    }

    /// Get the database file path
    pub fn get_path(&self) -> &Path {
        &self.db_path
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        Self::setup_tables(&conn)?;
        let mut store = Self {
            conn,
            db_path,
            profiles: Vec::new(),
            active_id: String::new(),
        };
        store.load()?;

        if store.profiles.is_empty() {
            let profile = Profile::new(Self::DEFAULT_PROFILE_NAME);
            log::info!("No profiles stored, creating '{}'", profile.name);
            store.active_id = profile.id.clone();
            store.profiles.push(profile);
            store.persist()?;
        }
        Ok(store)
    }

    fn setup_tables(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE if not exists profiles (
                id text PRIMARY KEY,
                name text NOT NULL,
                created text NOT NULL,
                position integer NOT NULL,
                data text NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE if not exists settings (
                key text PRIMARY KEY,
                value text
            )",
            [],
        )?;
        Ok(())
    }

    fn read_profiles(conn: &Connection) -> Result<Vec<Profile>> {
        let mut stmt = conn.prepare("SELECT data FROM profiles ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(serde_json::from_str::<Profile>(&row?)?);
        }
        Ok(profiles)
    }

    fn read_active_id(conn: &Connection) -> Result<Option<String>> {
        Ok(conn
            .query_row(
                "SELECT value FROM settings WHERE key = 'active_profile'",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Reload the working copy from disk
    fn load(&mut self) -> Result<()> {
        let profiles = Self::read_profiles(&self.conn)?;
        let stored_active = Self::read_active_id(&self.conn)?;

        self.active_id = match stored_active {
            Some(id) if profiles.iter().any(|p| p.id == id) => id,
            _ => profiles.first().map(|p| p.id.clone()).unwrap_or_default(),
        };
        self.profiles = profiles;
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ProfileError::ProfileNotFound(id.to_string()))
    }
}

impl ProfileStore for SqliteProfileStore {
    fn active_profile(&self) -> Result<Profile> {
        let index = self.position(&self.active_id)?;
        Ok(self.profiles[index].clone())
    }

    fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.profiles.clone())
    }

    fn create_profile(&mut self, mut data: Profile) -> Result<ProfileId> {
        data.id = new_id();
        let id = data.id.clone();
        log::debug!("Creating profile '{}' ({})", data.name, id);
        self.profiles.push(data);
        Ok(id)
    }

    fn update_profile(&mut self, profile: Profile) -> Result<()> {
        let index = self.position(&profile.id)?;
        self.profiles[index] = profile;
        Ok(())
    }

    fn set_active(&mut self, id: &str) -> Result<()> {
        self.position(id)?;
        self.active_id = id.to_string();
        Ok(())
    }

    fn persist(&mut self) -> Result<bool> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM profiles", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO profiles (id, name, created, position, data) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, profile) in self.profiles.iter().enumerate() {
                let data = serde_json::to_string(profile)?;
                stmt.execute((
                    &profile.id,
                    &profile.name,
                    profile.creation_timestamp.to_rfc3339(),
                    position as i64,
                    data,
                ))?;
            }
        }
        tx.execute(
            "INSERT INTO settings (key, value) VALUES ('active_profile', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [&self.active_id],
        )?;
        tx.commit()?;

        log::debug!("Persisted {} profile(s)", self.profiles.len());
        Ok(true)
    }

    fn discard(&mut self) -> Result<()> {
        log::debug!("Discarding unsaved profile changes");
        self.load()
    }
}
