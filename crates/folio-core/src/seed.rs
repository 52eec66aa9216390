use crate::models::{ImageSource, ProjectRecord};
use chrono::{DateTime, NaiveDate, Utc};

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn techs(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

/// The four example projects used to populate an empty store.
pub fn seed_projects() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord {
            id: "1".to_string(),
            title: "Sistema de Papelaria (Projeto Integrador)".to_string(),
            description: "Sistema completo de gestão para papelaria, incluindo controle de estoque, vendas e cadastro de produtos. Foco em regras de negócio.".to_string(),
            technologies: techs(&["React", "Node.js", "PostgreSQL", "Tailwind CSS"]),
            github_url: "https://github.com/daniolivem/projeto-integrador-papelaria".to_string(),
            figma_url: None,
            deploy_url: None,
            image: ImageSource::Url("https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=800".to_string()),
            created_at: seed_date(2024, 11, 10),
        },
        ProjectRecord {
            id: "2".to_string(),
            title: "API de Gestão (Capacita)".to_string(),
            description: "API RESTful robusta desenvolvida para gerenciamento de cadastros de alunos, focada em arquitetura backend e performance.".to_string(),
            technologies: techs(&["Node.js", "Express", "PostgreSQL", "Prisma"]),
            github_url: "https://github.com/Maycacon/CAPACITA---Oficina-2".to_string(),
            figma_url: None,
            deploy_url: None,
            image: ImageSource::Url("https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=800".to_string()),
            created_at: seed_date(2024, 9, 15),
        },
        ProjectRecord {
            id: "3".to_string(),
            title: "Calculadora React".to_string(),
            description: "Aplicação interativa para praticar lógica de estado (useState) e componentização moderna no ecossistema React.".to_string(),
            technologies: techs(&["React", "CSS Modules", "JavaScript"]),
            github_url: "https://github.com/Maycacon/calculadora-react".to_string(),
            figma_url: None,
            deploy_url: Some("https://calculadora-react-woad.vercel.app/".to_string()),
            image: ImageSource::Url("https://images.unsplash.com/photo-1591696205602-2f950c417cb9?w=800".to_string()),
            created_at: seed_date(2024, 5, 20),
        },
        ProjectRecord {
            id: "4".to_string(),
            title: "Conversor de Unidades".to_string(),
            description: "Ferramenta utilitária para conversão de métricas diversas. Projeto focado em lógica matemática e algoritmos.".to_string(),
            technologies: techs(&["JavaScript", "HTML", "CSS"]),
            github_url: "https://github.com/Maycacon/ConversoUnitsUnfior".to_string(),
            figma_url: None,
            deploy_url: None,
            image: ImageSource::Url("https://images.unsplash.com/photo-1518770660439-4636190af475?w=800".to_string()),
            created_at: seed_date(2024, 3, 10),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_records_are_valid_and_unique() {
        let seed = seed_projects();
        assert_eq!(seed.len(), 4);
        for record in &seed {
            assert!(record.check_invariants().is_ok(), "{} is invalid", record.id);
        }
        let mut ids: Vec<_> = seed.iter().map(|r| r.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(seed[0].created_at.to_rfc3339(), "2024-11-10T00:00:00+00:00");
    }
}
