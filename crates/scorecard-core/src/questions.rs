use scorecard_types::Category::{self, Behavior, Motivation, Passion, Skills};
use scorecard_types::Question;

const QUESTIONS: [(&str, Category); 25] = [
    // Passion
    ("What excites you most about this role or industry?", Passion),
    ("Can you share a project or activity you pursued outside your formal responsibilities because of genuine interest?", Passion),
    ("How do you stay updated on new trends, tools, or practices in your field?", Passion),
    ("What’s a professional achievement you are proud of, and why?", Passion),
    ("How would you handle a task you’re not passionate about?", Passion),
    // Motivation
    ("What motivates you to perform at your best?", Motivation),
    ("Describe a time you overcame a significant challenge—what kept you going?", Motivation),
    ("How do you set and track personal and professional goals?", Motivation),
    ("What drives you to seek new responsibilities or challenges?", Motivation),
    ("How do you stay motivated during routine or repetitive work?", Motivation),
    // Skills & learning
    ("List three of your strongest skills and provide examples of when you used them successfully.", Skills),
    ("What’s a skill you’ve improved significantly in the last year, and how?", Skills),
    ("How do you approach learning a new technology or tool?", Skills),
    ("Describe a situation where you had to adapt quickly to a new process or system.", Skills),
    ("How do you prefer to receive feedback on your work, and how do you act on it?", Skills),
    // Behavior & workstyle
    ("Do you prefer working independently, collaboratively, or with a mix? Why?", Behavior),
    ("Describe a time when you had a conflict at work and how you resolved it.", Behavior),
    ("How do you manage stress or tight deadlines?", Behavior),
    ("How do you organize and prioritize your workload?", Behavior),
    ("Give an example of how you’ve contributed to a team’s success.", Behavior),
    // Adaptability, leadership, culture & ethics
    ("Tell us about a time you had to quickly adapt to an unexpected change. What did you do?", Behavior),
    ("What role do you usually take in team situations, and how do you support others?", Behavior),
    ("How would you describe your ideal work culture or environment?", Behavior),
    ("Share an instance where you faced an ethical dilemma at work. How did you handle it?", Behavior),
    ("How do you ensure your actions align with the company’s mission and values?", Motivation),
];

/// The fixed assessment questionnaire, in presentation order.
pub fn question_bank() -> Vec<Question> {
    QUESTIONS
        .iter()
        .map(|(text, category)| Question::new(*text, *category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_has_25_questions() {
        assert_eq!(question_bank().len(), 25);
    }

    #[test]
    fn test_bank_covers_every_category() {
        let bank = question_bank();
        for category in Category::ALL {
            assert!(bank.iter().any(|q| q.category == category), "{category} missing");
        }
    }

    #[test]
    fn test_bank_order_is_stable() {
        let bank = question_bank();
        assert_eq!(bank[0].text, "What excites you most about this role or industry?");
        assert_eq!(bank[24].category, Category::Motivation);
    }
}
