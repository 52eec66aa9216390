use crate::models::{ImageSource, ProjectRecord};

/// Technologies shown on a card before collapsing into a `+N` badge.
pub const CARD_TECHNOLOGIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    pub label: &'static str,
    pub url: &'a str,
}

/// What the public projects page shows for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub technologies: &'a [String],
    pub hidden_technologies: usize,
    pub links: Vec<Link<'a>>,
    pub image: &'a ImageSource,
}

impl<'a> From<&'a ProjectRecord> for ProjectCard<'a> {
    fn from(record: &'a ProjectRecord) -> Self {
        let shown = record.technologies.len().min(CARD_TECHNOLOGIES);
        let mut links = vec![Link { label: "GitHub", url: &record.github_url }];
        if let Some(url) = &record.figma_url {
            links.push(Link { label: "Figma", url });
        }
        if let Some(url) = &record.deploy_url {
            links.push(Link { label: "View project", url });
        }
        Self {
            title: &record.title,
            description: &record.description,
            technologies: &record.technologies[..shown],
            hidden_technologies: record.technologies.len() - shown,
            links,
            image: &record.image,
        }
    }
}

impl ProjectCard<'_> {
    pub fn overflow_badge(&self) -> Option<String> {
        (self.hidden_technologies > 0).then(|| format!("+{}", self.hidden_technologies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_projects;

    #[test]
    fn card_collapses_extra_technologies() {
        let seed = seed_projects();
        let card = ProjectCard::from(&seed[0]);
        assert_eq!(card.technologies, ["React", "Node.js", "PostgreSQL"]);
        assert_eq!(card.overflow_badge().as_deref(), Some("+1"));
        assert_eq!(card.links.len(), 1);
    }

    #[test]
    fn card_lists_optional_links_in_order() {
        let seed = seed_projects();
        let card = ProjectCard::from(&seed[2]);
        assert_eq!(card.overflow_badge(), None);
        let labels: Vec<_> = card.links.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["GitHub", "View project"]);
    }
}
