// ============================================================
// Layer 3 — Careers
// ============================================================
// The classifier predicts one of six fixed careers. Each one
// carries a static description block that is attached to
// predictions for display.
//
// Career::ALL is the class order used when no trained model
// (and therefore no fitted role encoder) is available.

use serde::Serialize;

/// Static, display-only facts about a career.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerInfo {
    pub description:  &'static str,
    pub skills:       &'static [&'static str],
    pub technologies: &'static [&'static str],
    pub salary_range: &'static str,
    pub companies:    &'static [&'static str],
    pub growth_path:  &'static str,
}

/// The closed set of careers the system can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Career {
    DataScientist,
    SoftwareDeveloper,
    CloudEngineer,
    CybersecurityAnalyst,
    WebDeveloper,
    AiMlEngineer,
}

impl Career {
    /// Default class order (used by the rule-based fallback)
    pub const ALL: [Career; 6] = [
        Career::DataScientist,
        Career::SoftwareDeveloper,
        Career::CloudEngineer,
        Career::CybersecurityAnalyst,
        Career::WebDeveloper,
        Career::AiMlEngineer,
    ];

    /// Display name, also the label used in datasets
    pub fn name(self) -> &'static str {
        match self {
            Career::DataScientist        => "Data Scientist",
            Career::SoftwareDeveloper    => "Software Developer",
            Career::CloudEngineer        => "Cloud Engineer",
            Career::CybersecurityAnalyst => "Cybersecurity Analyst",
            Career::WebDeveloper         => "Web Developer",
            Career::AiMlEngineer         => "AI/ML Engineer",
        }
    }

    /// Look a career up by its exact display name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Class names in default order
    pub fn default_classes() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    /// Static description block for this career
    pub fn info(self) -> &'static CareerInfo {
        match self {
            Career::DataScientist        => &DATA_SCIENTIST,
            Career::SoftwareDeveloper    => &SOFTWARE_DEVELOPER,
            Career::CloudEngineer        => &CLOUD_ENGINEER,
            Career::CybersecurityAnalyst => &CYBERSECURITY_ANALYST,
            Career::WebDeveloper         => &WEB_DEVELOPER,
            Career::AiMlEngineer         => &AI_ML_ENGINEER,
        }
    }
}

/// Info for a class label, if the label is one of the six careers
pub fn career_info(name: &str) -> Option<&'static CareerInfo> {
    Career::parse(name).map(Career::info)
}

// ─── Static career table ──────────────────────────────────────────────────────

static DATA_SCIENTIST: CareerInfo = CareerInfo {
    description:  "Data Scientists analyze complex data to help organizations make informed decisions using statistical methods, machine learning, and data visualization.",
    skills:       &["Python/R", "Machine Learning", "Statistics", "SQL", "Data Visualization", "Big Data Tools"],
    technologies: &["Python", "R", "TensorFlow", "PyTorch", "Pandas", "Scikit-learn", "Tableau", "Power BI"],
    salary_range: "$70,000 - $150,000",
    companies:    &["Google", "Amazon", "Microsoft", "Netflix", "Uber", "Airbnb"],
    growth_path:  "Junior Data Scientist → Data Scientist → Senior Data Scientist → Lead Data Scientist → Chief Data Officer",
};

static SOFTWARE_DEVELOPER: CareerInfo = CareerInfo {
    description:  "Software Developers design, create, and maintain software applications and systems using various programming languages and frameworks.",
    skills:       &["Programming", "Problem Solving", "Software Design", "Testing", "Version Control", "Agile Methodologies"],
    technologies: &["Java", "Python", "JavaScript", "C++", "Git", "Docker", "Kubernetes", "React", "Angular"],
    salary_range: "$60,000 - $130,000",
    companies:    &["Microsoft", "Google", "Apple", "Facebook", "Amazon", "IBM"],
    growth_path:  "Junior Developer → Software Developer → Senior Developer → Tech Lead → Engineering Manager",
};

static CLOUD_ENGINEER: CareerInfo = CareerInfo {
    description:  "Cloud Engineers design, implement, and manage cloud computing systems and infrastructure for organizations.",
    skills:       &["Cloud Platforms", "Infrastructure as Code", "DevOps", "Networking", "Security", "Automation"],
    technologies: &["AWS", "Azure", "Google Cloud", "Terraform", "Kubernetes", "Docker", "Jenkins", "Ansible"],
    salary_range: "$75,000 - $140,000",
    companies:    &["Amazon", "Microsoft", "Google", "IBM", "Oracle", "Salesforce"],
    growth_path:  "Cloud Associate → Cloud Engineer → Senior Cloud Engineer → Cloud Architect → Cloud Solutions Director",
};

static CYBERSECURITY_ANALYST: CareerInfo = CareerInfo {
    description:  "Cybersecurity Analysts protect organizations from digital threats by monitoring, detecting, and responding to security incidents.",
    skills:       &["Network Security", "Incident Response", "Risk Assessment", "Penetration Testing", "Compliance", "Forensics"],
    technologies: &["Wireshark", "Metasploit", "Nessus", "Splunk", "SIEM Tools", "Firewall Management"],
    salary_range: "$65,000 - $125,000",
    companies:    &["Cisco", "Palo Alto Networks", "CrowdStrike", "FireEye", "IBM", "Deloitte"],
    growth_path:  "Security Analyst → Senior Security Analyst → Security Engineer → Security Architect → CISO",
};

static WEB_DEVELOPER: CareerInfo = CareerInfo {
    description:  "Web Developers create and maintain websites and web applications using various programming languages and frameworks.",
    skills:       &["HTML/CSS", "JavaScript", "Frontend Frameworks", "Backend Development", "Database Management", "Responsive Design"],
    technologies: &["HTML5", "CSS3", "JavaScript", "React", "Vue.js", "Node.js", "PHP", "MySQL", "MongoDB"],
    salary_range: "$50,000 - $110,000",
    companies:    &["Shopify", "WordPress", "Squarespace", "Wix", "Adobe", "Mozilla"],
    growth_path:  "Junior Web Developer → Web Developer → Senior Web Developer → Full Stack Developer → Technical Lead",
};

static AI_ML_ENGINEER: CareerInfo = CareerInfo {
    description:  "AI/ML Engineers develop and deploy machine learning models and artificial intelligence systems for various applications.",
    skills:       &["Machine Learning", "Deep Learning", "Neural Networks", "Model Deployment", "Data Engineering", "MLOps"],
    technologies: &["Python", "TensorFlow", "PyTorch", "Keras", "MLflow", "Kubeflow", "Docker", "AWS SageMaker"],
    salary_range: "$80,000 - $160,000",
    companies:    &["OpenAI", "Google DeepMind", "Tesla", "NVIDIA", "Meta", "Apple"],
    growth_path:  "ML Engineer → Senior ML Engineer → Principal ML Engineer → ML Architect → Head of AI",
};

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips_through_parse() {
        for career in Career::ALL {
            assert_eq!(Career::parse(career.name()), Some(career));
        }
        assert_eq!(Career::parse("Astronaut"), None);
    }

    #[test]
    fn test_unknown_label_has_no_info() {
        assert!(career_info("Web Developer").is_some());
        assert!(career_info("web developer").is_none());
    }
}
