use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Category, Location};

// Word sequence after a marker; stops at sentence or clause punctuation.
static NEIGHBORHOOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:bairro|no|na)\s+([\p{L}][\p{L}\s'-]*)").unwrap());

struct Rule {
    keywords: &'static [&'static str],
    category: Category,
}

/// Evaluated top to bottom; the first rule with a matching keyword wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &[
            "paviment", "asfalt", "buraco", "recape", "infraestrutura", "calçament",
            "calcament",
        ],
        category: Category::UrbanInfrastructure,
    },
    Rule {
        keywords: &[
            "lixo", "recicla", "coleta seletiva", "limpeza", "boca de lobo", "bueiro", "poda",
            "capina", "roçada", "rocada", "mato", "vegetação", "vegetacao", "entulho",
            "drenagem",
        ],
        category: Category::EnvironmentAndSanitation,
    },
    Rule {
        keywords: &[
            "trânsito", "transito", "sinalização", "sinalizacao", "faixa de pedestre",
            "pedestre", "lombada", "redutor de velocidade", "estacionamento", "velocidade",
        ],
        category: Category::MobilityAndTransit,
    },
    Rule {
        keywords: &["iluminação", "iluminacao", "lâmpada", "lampada", "luminária", "luminaria"],
        category: Category::PublicServices,
    },
    Rule {
        keywords: &["segurança", "seguranca", "procon"],
        category: Category::PublicSafety,
    },
    Rule {
        keywords: &["praça", "praca", "parque"],
        category: Category::CommunitySpaces,
    },
];

const DEFAULT_CATEGORY: Category = Category::UrbanInfrastructure;

/// Assign a category from the summary text. Total: unmatched text falls back
/// to `UrbanInfrastructure`.
pub fn classify(summary: &str) -> Category {
    let lower = summary.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Best-effort address and neighborhood hints from the summary.
pub fn derive_location(summary: &str) -> Location {
    let address = summary
        .split(',')
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    let neighborhood = NEIGHBORHOOD_RE
        .captures(summary)
        .map(|caps| trim_trailing_punct(&caps[1]))
        .filter(|n| !n.is_empty());

    Location {
        address,
        neighborhood,
    }
}

fn trim_trailing_punct(s: &str) -> String {
    s.trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_group() {
        let cases = [
            ("Operação tapa-buraco na Rua das Flores", Category::UrbanInfrastructure),
            ("Recapeamento asfáltico da avenida", Category::UrbanInfrastructure),
            ("Limpeza de boca de lobo", Category::EnvironmentAndSanitation),
            ("Poda de árvores na praça central", Category::EnvironmentAndSanitation),
            ("Retirada de entulho", Category::EnvironmentAndSanitation),
            ("Instalação de lombada", Category::MobilityAndTransit),
            ("Pintura de faixa de pedestres", Category::MobilityAndTransit),
            ("Troca de lâmpadas queimadas", Category::PublicServices),
            ("Ampliação da ILUMINAÇÃO pública", Category::PublicServices),
            ("Posto do Procon no centro", Category::PublicSafety),
            ("Reforço na segurança escolar", Category::PublicSafety),
            ("Revitalização do parque municipal", Category::CommunitySpaces),
        ];
        for (summary, expected) in cases {
            assert_eq!(classify(summary), expected, "summary: {summary}");
        }
    }

    #[test]
    fn total_over_any_input() {
        assert_eq!(classify(""), Category::UrbanInfrastructure);
        assert_eq!(classify("Moção de aplauso"), Category::UrbanInfrastructure);
        assert_eq!(classify("🚧🚧"), Category::UrbanInfrastructure);
    }

    #[test]
    fn earlier_group_wins() {
        // paving + park
        assert_eq!(
            classify("Pavimentação da rua em frente ao parque"),
            Category::UrbanInfrastructure
        );
        // lighting + plaza
        assert_eq!(classify("Iluminação da praça"), Category::PublicServices);
        // traffic + safety
        assert_eq!(
            classify("Sinalização para segurança dos alunos"),
            Category::MobilityAndTransit
        );
    }

    #[test]
    fn address_before_first_comma() {
        let loc = derive_location("Rua Sete de Setembro, 120, poda de árvore");
        assert_eq!(loc.address.as_deref(), Some("Rua Sete de Setembro"));
    }

    #[test]
    fn address_without_comma_is_whole_summary() {
        let loc = derive_location("  Troca de lâmpadas  ");
        assert_eq!(loc.address.as_deref(), Some("Troca de lâmpadas"));
        assert_eq!(derive_location("").address, None);
    }

    #[test]
    fn neighborhood_after_marker() {
        let loc = derive_location("Limpeza de terreno, bairro Jardim América.");
        assert_eq!(loc.neighborhood.as_deref(), Some("Jardim América"));

        let loc = derive_location("Tapa-buraco na Vila Nova, próximo à escola");
        assert_eq!(loc.neighborhood.as_deref(), Some("Vila Nova"));
    }

    #[test]
    fn neighborhood_stops_at_sentence_end() {
        let loc = derive_location("Poda de árvore no Centro. Pedido reiterado pelos moradores");
        assert_eq!(loc.neighborhood.as_deref(), Some("Centro"));

        let loc = derive_location("Capina na Vila Nova; urgente");
        assert_eq!(loc.neighborhood.as_deref(), Some("Vila Nova"));
    }

    #[test]
    fn neighborhood_absent_without_marker() {
        let loc = derive_location("Recapeamento asfáltico geral");
        assert_eq!(loc.neighborhood, None);
    }

    #[test]
    fn marker_must_be_whole_word() {
        // "tecnologia" ends in "na" but is not the marker
        let loc = derive_location("Tecnologia");
        assert_eq!(loc.neighborhood, None);
    }
}
