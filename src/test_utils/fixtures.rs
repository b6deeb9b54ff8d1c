use std::path::PathBuf;

use tempfile::TempDir;

/// A prompt with explicit markdown headings for every category.
pub const MARKED_PROMPT: &str = "\
# Role
You are a senior travel agent with years of experience.

# Task
Plan a three-day itinerary for Lisbon.

# Context
The traveler is on a budget and prefers walking.

# Output Format
Return a markdown table with one row per day.

# Tone
Friendly and concise.

# Constraints
Do not suggest more than four activities per day.";

/// The same kind of prompt written as plain paragraphs.
pub const PARAGRAPH_PROMPT: &str = "\
You are an expert chef who specializes in quick weeknight dinners.

Your task is to create a recipe that uses only pantry staples.

Respond with a numbered list of steps.

Never use more than ten ingredients.";

/// A prompt with no structure at all.
pub const UNSTRUCTURED_PROMPT: &str = "lorem ipsum dolor sit amet";

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a prompt file under `prompts/`.
    #[must_use]
    pub fn create_prompt(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(&format!("prompts/{name}"), content)
    }

    /// Create a JSON edit script under `scripts/`.
    #[must_use]
    pub fn create_script(&self, name: &str, json: &str) -> PathBuf {
        self.create_file(&format!("scripts/{name}"), json)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
