use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embeddings::{ensure_count, Embedding, EmbeddingProvider};
use crate::errors::AdvisorError;
use crate::similarity::{cosine_similarity, top_n_indices};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

impl Role {
    pub fn new(title: &str, description: &str, skills: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Text embedded for the role: title, description, then skills.
    pub fn profile_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.skills.join(" ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRole {
    pub rank: usize,
    pub score: f32,
    pub role: Role,
}

/// Loads a role catalog from a JSON array of `{title, description, skills}`.
pub fn load_roles(path: &Path) -> Result<Vec<Role>, AdvisorError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AdvisorError::Configuration(format!("cannot read role catalog {}: {e}", path.display()))
    })?;
    let roles: Vec<Role> = serde_json::from_str(&raw).map_err(|e| {
        AdvisorError::Configuration(format!("invalid role catalog {}: {e}", path.display()))
    })?;
    if roles.is_empty() {
        return Err(AdvisorError::Configuration(format!(
            "role catalog {} is empty",
            path.display()
        )));
    }
    Ok(roles)
}

/// Role catalog with its profile embeddings computed once, at load time.
pub struct RoleCatalog {
    roles: Vec<Role>,
    embeddings: Vec<Embedding>,
}

impl RoleCatalog {
    pub fn build(roles: Vec<Role>, embedder: &dyn EmbeddingProvider) -> Result<Self, AdvisorError> {
        let profiles: Vec<String> = roles.iter().map(Role::profile_text).collect();
        let embeddings = if profiles.is_empty() {
            Vec::new()
        } else {
            ensure_count(profiles.len(), embedder.embed_batch(&profiles)?)?
        };
        debug!(roles = roles.len(), "cached role embeddings");
        Ok(Self { roles, embeddings })
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Ranks the catalog by embedding cosine similarity to `text`. Only the
    /// query is embedded; `embedder` must be the one the catalog was built with.
    ///
    /// Negative similarities are reported as 0. Ties keep catalog order.
    pub fn rank(
        &self,
        text: &str,
        embedder: &dyn EmbeddingProvider,
        top_n: usize,
    ) -> Result<Vec<RankedRole>, AdvisorError> {
        if self.roles.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let query = embedder.embed(text)?;
        let scores: Vec<f32> = self
            .embeddings
            .iter()
            .map(|v| cosine_similarity(&query, v).max(0.0))
            .collect();

        debug!(roles = self.roles.len(), top_n, "ranked roles");

        Ok(top_n_indices(&scores, top_n)
            .into_iter()
            .enumerate()
            .map(|(position, idx)| RankedRole {
                rank: position + 1,
                score: scores[idx],
                role: self.roles[idx].clone(),
            })
            .collect())
    }
}

/// Built-in catalog of twenty software roles.
pub fn builtin_roles() -> Vec<Role> {
    vec![
        Role::new(
            "AI Engineer",
            "Develops AI models and ML pipelines for automation and smart applications.",
            &["Python", "TensorFlow", "Machine Learning", "Deep Learning", "PyTorch", "Scikit-learn"],
        ),
        Role::new(
            "Data Scientist",
            "Performs advanced statistical analysis and builds predictive models.",
            &["Python", "R", "Statistics", "Machine Learning", "Pandas", "Matplotlib", "SQL"],
        ),
        Role::new(
            "Data Analyst",
            "Analyzes data trends, creates reports, and builds dashboards.",
            &["SQL", "Excel", "Tableau", "Statistics", "Power BI", "Python"],
        ),
        Role::new(
            "Web Developer",
            "Builds and maintains websites and web apps using front and back-end tech.",
            &["HTML", "CSS", "JavaScript", "React", "Node.js", "Express.js", "MongoDB"],
        ),
        Role::new(
            "Frontend Developer",
            "Creates interactive user interfaces and optimizes user experiences.",
            &["HTML", "CSS", "JavaScript", "React", "Vue.js", "TypeScript", "Figma"],
        ),
        Role::new(
            "Backend Developer",
            "Develops server-side logic and integrates with databases.",
            &["Node.js", "Express", "Django", "Flask", "SQL", "MongoDB", "Python", "Java"],
        ),
        Role::new(
            "DevOps Engineer",
            "Manages CI/CD pipelines, infrastructure automation, and deployments.",
            &["Docker", "Kubernetes", "CI/CD", "AWS", "Terraform", "Linux", "Jenkins"],
        ),
        Role::new(
            "Cloud Engineer",
            "Designs and maintains cloud infrastructure and services.",
            &["AWS", "Azure", "Google Cloud", "Terraform", "CloudFormation", "Python"],
        ),
        Role::new(
            "Cybersecurity Analyst",
            "Protects systems from attacks and monitors suspicious activity.",
            &["Networking", "Linux", "Python", "Security Tools", "Penetration Testing", "Firewalls"],
        ),
        Role::new(
            "Mobile App Developer",
            "Builds apps for Android and iOS platforms.",
            &["Kotlin", "Swift", "React Native", "Flutter", "Java", "Dart", "Firebase"],
        ),
        Role::new(
            "Game Developer",
            "Creates video games for different platforms.",
            &["Unity", "C#", "Unreal Engine", "C++", "3D Modeling", "Game Design"],
        ),
        Role::new(
            "Blockchain Developer",
            "Develops decentralized applications and smart contracts.",
            &["Solidity", "Ethereum", "Web3.js", "Smart Contracts", "Cryptography", "Rust"],
        ),
        Role::new(
            "Machine Learning Engineer",
            "Designs ML systems and productionizes models.",
            &["Scikit-learn", "TensorFlow", "Keras", "ML Ops", "Python", "Pandas", "Airflow"],
        ),
        Role::new(
            "NLP Engineer",
            "Focuses on text-based AI like chatbots, translation, sentiment analysis.",
            &["SpaCy", "NLTK", "Hugging Face Transformers", "BERT", "Text Classification", "Python"],
        ),
        Role::new(
            "Robotics Engineer",
            "Builds robotic systems using software and hardware integration.",
            &["ROS", "C++", "Python", "Sensors", "Actuators", "Embedded Systems"],
        ),
        Role::new(
            "Embedded Systems Engineer",
            "Develops software for embedded devices like microcontrollers.",
            &["C", "C++", "Assembly", "RTOS", "Microcontrollers", "I2C", "SPI"],
        ),
        Role::new(
            "Systems Administrator",
            "Maintains server infrastructure and IT systems.",
            &["Linux", "Bash", "Networking", "Firewalls", "System Monitoring", "VMware"],
        ),
        Role::new(
            "Database Administrator",
            "Maintains and optimizes databases for performance and reliability.",
            &["SQL", "Oracle", "MySQL", "PostgreSQL", "Backup & Recovery", "Database Tuning"],
        ),
        Role::new(
            "Full Stack Developer",
            "Works on both frontend and backend parts of applications.",
            &["JavaScript", "React", "Node.js", "MongoDB", "HTML", "CSS", "Python", "Express.js"],
        ),
        Role::new(
            "UI/UX Designer",
            "Designs intuitive user interfaces and experiences.",
            &["Figma", "Adobe XD", "User Research", "Wireframing", "Prototyping", "Sketch"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test_utils::{ConceptEmbedder, CountingEmbedder, FailingEmbedder};

    fn small_catalog() -> Vec<Role> {
        vec![
            Role::new("Chef", "Plans menus.", &["Cooking", "Baking"]),
            Role::new("ML Engineer", "Trains models.", &["PyTorch", "Machine Learning"]),
            Role::new("Cloud Engineer", "Runs infrastructure.", &["AWS", "Kubernetes"]),
        ]
    }

    #[test]
    fn test_builtin_catalog_has_twenty_roles() {
        let roles = builtin_roles();
        assert_eq!(roles.len(), 20);
        assert!(roles.iter().all(|r| !r.skills.is_empty()));
    }

    #[test]
    fn test_profile_text_joins_fields() {
        let role = Role::new("Chef", "Plans menus.", &["Cooking", "Baking"]);
        assert_eq!(role.profile_text(), "Chef Plans menus. Cooking Baking");
    }

    fn catalog(embedder: &dyn EmbeddingProvider) -> RoleCatalog {
        RoleCatalog::build(small_catalog(), embedder).unwrap()
    }

    #[test]
    fn test_closest_role_ranks_first() {
        let embedder = ConceptEmbedder::new();
        let ranked = catalog(&embedder)
            .rank("deep machine learning with pytorch", &embedder, 2)
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].role.title, "ML Engineer");
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_unrelated_text_scores_zero_in_catalog_order() {
        let embedder = ConceptEmbedder::new();
        let ranked = catalog(&embedder).rank("", &embedder, 3).unwrap();
        assert!(ranked.iter().all(|r| r.score == 0.0));
        let titles: Vec<&str> = ranked.iter().map(|r| r.role.title.as_str()).collect();
        assert_eq!(titles, vec!["Chef", "ML Engineer", "Cloud Engineer"]);
    }

    #[test]
    fn test_empty_catalog_or_zero_top_n() {
        let embedder = ConceptEmbedder::new();
        let empty = RoleCatalog::build(Vec::new(), &embedder).unwrap();
        assert!(empty.is_empty());
        assert!(empty.rank("python", &embedder, 5).unwrap().is_empty());
        assert!(catalog(&embedder)
            .rank("python", &embedder, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let err = RoleCatalog::build(small_catalog(), &FailingEmbedder).err();
        assert!(err.map(|e| e.is_dependency()).unwrap_or(false));

        let built = catalog(&ConceptEmbedder::new());
        let err = built.rank("python", &FailingEmbedder, 3).unwrap_err();
        assert!(err.is_dependency());
    }

    #[test]
    fn test_repeated_ranking_embeds_only_queries() {
        let embedder = CountingEmbedder::new();
        let catalog = catalog(&embedder);
        assert_eq!(embedder.embedded(), 3);

        for query in ["python", "aws cloud", "baking recipes"] {
            catalog.rank(query, &embedder, 2).unwrap();
        }
        assert_eq!(embedder.embedded(), 6);
    }

    #[test]
    fn test_load_roles_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "Chef", "description": "Cooks.", "skills": ["Baking"]}}]"#
        )
        .unwrap();
        let roles = load_roles(file.path()).unwrap();
        assert_eq!(roles, vec![Role::new("Chef", "Cooks.", &["Baking"])]);

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(
            load_roles(empty.path()),
            Err(AdvisorError::Configuration(_))
        ));
    }
}
