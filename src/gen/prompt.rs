//! Prompt construction for the generation endpoints. The prompts are kept in
//! Portuguese: the product targets Brazilian concurso candidates and the
//! service is instructed in the language it must answer in.

use crate::model::{QuizSettings, StudyPlanSettings};

pub fn quiz(settings: &QuizSettings) -> String {
    format!(
        "Você é um especialista em criar simulados para concursos públicos no Brasil.\n\
         Sua tarefa é criar um simulado com {num} questões de múltipla escolha.\n\n\
         Tema do Simulado: \"{subject}\"\n\
         Nível de Dificuldade: {difficulty}\n\n\
         Instruções:\n\
         1. Crie exatamente {num} questões.\n\
         2. Cada questão deve ter 5 opções de resposta (A, B, C, D, E).\n\
         3. Para cada questão, atribua uma BANCA de concurso realista que costuma \
         cobrar esse tipo de conteúdo (ex: Cebraspe, FGV, FCC, Vunesp, Cesgranrio, \
         AOCP, Quadrix, Consulplan, ESAF, IBFC, IBADE, IBAM).\n\
         4. Para cada questão, indique qual é a resposta correta (campo \
         correctAnswerIndex, índice base 0) e forneça uma explicação clara e \
         detalhada no campo explanation.\n\
         5. As questões e explicações devem ser relevantes e de alta qualidade, \
         adequadas para o nível de dificuldade especificado.\n\
         6. A saída deve ser um objeto JSON com uma única propriedade \"questions\". \
         Não inclua markdown ou qualquer texto fora da estrutura JSON.",
        num = settings.num_questions,
        subject = settings.subject,
        difficulty = settings.difficulty.label_pt(),
    )
}

pub fn study_plan(settings: &StudyPlanSettings) -> String {
    format!(
        "Você é um coach especialista em preparação para concursos públicos no \
         Brasil. Sua tarefa é criar um plano de estudos personalizado e detalhado.\n\n\
         Objetivo do Usuário: {goal}\n\
         Matérias a Estudar: {subjects}\n\
         Tempo Disponível: {hours} horas por semana\n\
         Duração do Plano: {weeks} semanas\n\n\
         Instruções:\n\
         1. Crie um plano de estudos semanal detalhado para a duração total \
         especificada.\n\
         2. Distribua o tempo de estudo semanal de forma equilibrada entre as \
         matérias listadas.\n\
         3. Para cada semana, defina um foco claro.\n\
         4. Para cada dia da semana com estudo planejado, detalhe as atividades: \
         matéria, tipo de atividade (leitura de teoria, resolução de exercícios, \
         criação de resumos, revisão) e a duração.\n\
         5. Intercale diferentes tipos de atividades e matérias para otimizar o \
         aprendizado, e inclua sessões de revisão periódicas e tempo para simulados.\n\
         6. A saída deve ser um objeto JSON com as propriedades \"title\" e \
         \"weeklyPlan\". Não inclua markdown ou qualquer texto fora da estrutura JSON.",
        goal = settings.goal,
        subjects = settings.subjects.join(", "),
        hours = settings.hours_per_week,
        weeks = settings.duration_in_weeks,
    )
}

pub fn speech(text: &str) -> String {
    format!(
        "Leia o seguinte texto de forma clara e pausada para um estudante de \
         concurso: {text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn quiz_prompt_forwards_question_count_unchanged() {
        for num in crate::model::QUESTION_COUNTS {
            let settings = QuizSettings {
                subject: "Direito Administrativo".to_string(),
                num_questions: num,
                difficulty: Difficulty::Medium,
            };
            let prompt = quiz(&settings);
            assert!(prompt.contains(&format!("simulado com {num} questões")));
            assert!(prompt.contains(&format!("exatamente {num} questões")));
        }
    }

    #[test]
    fn quiz_prompt_carries_subject_and_difficulty() {
        let settings = QuizSettings {
            subject: "Raciocínio Lógico".to_string(),
            num_questions: 5,
            difficulty: Difficulty::Hard,
        };
        let prompt = quiz(&settings);
        assert!(prompt.contains("\"Raciocínio Lógico\""));
        assert!(prompt.contains("Difícil"));
    }

    #[test]
    fn plan_prompt_joins_subjects_and_forwards_numbers() {
        let settings = StudyPlanSettings {
            goal: "Aprovação no TRF".to_string(),
            subjects: vec!["Português".to_string(), "Informática".to_string()],
            hours_per_week: 12,
            duration_in_weeks: 8,
        };
        let prompt = study_plan(&settings);
        assert!(prompt.contains("Português, Informática"));
        assert!(prompt.contains("12 horas por semana"));
        assert!(prompt.contains("8 semanas"));
    }
}
