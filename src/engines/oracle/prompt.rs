use crate::engines::generation::genome::Genome;

/// Build the natural-language request for one batch.
///
/// The requirements listed here are asked of the oracle, not trusted: the fitness
/// evaluator checks letters, order, length and similarity on its own.
pub fn build_prompt(genomes: &[Genome], topic: &str, target_words: &[String]) -> String {
    let targets = if target_words.is_empty() {
        "the items".to_string()
    } else {
        target_words.join(", ")
    };

    let constraints = genomes
        .iter()
        .enumerate()
        .map(|(i, g)| format!("[{}]: {}", i + 1, g.to_constraint_string()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You write memorable mnemonic sentences.\n\
         Write EXACTLY {count} mnemonics for the targets: {targets}.\n\
         Topic context: {topic}.\n\
         \n\
         Every mnemonic must follow these rules:\n\
         - Initial letters: word i starts with the same letter as target i (case-insensitive).\n\
         - Order: the words appear in the same order as the targets.\n\
         - No filler: the sentence contains only the mnemonic words, one per target.\n\
         - Vividness: prefer concrete nouns and action verbs that form a bizarre, sticky image.\n\
         - Similarity: each word should echo its target in spelling and sound \
         (shared letters in the same order, similar syllable count and stress).\n\
         \n\
         Letters and roles for each mnemonic, as letter(role):\n\
         {constraints}\n\
         \n\
         Return ONLY valid JSON, no markdown and no explanations, in exactly this shape:\n\
         {{ \"mnemonics\": [ {{ \"sentence\": \"...\", \"words\": [\"...\"] }} ] }}\n",
        count = genomes.len(),
        targets = targets,
        topic = topic,
        constraints = constraints,
    )
}
