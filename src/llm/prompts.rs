/// Fixed summarization directive sent with every transcript.
pub const BASE_INSTRUCTION: &str = "Quero que você resuma o transcript em anexo para mim em tópicos \
como se fossem capítulos em ordem cronológica, adicione por conta própria insights valiosos e faça \
um resumo geral no final.";

/// Build the instructions for a summary, appending the caller's supplement
/// as an extra directive line.
pub fn build_instructions(prompt_supplement: Option<&str>) -> String {
    match prompt_supplement {
        Some(supplement) => format!("{BASE_INSTRUCTION}\nComplemento ao prompt: {supplement}"),
        None => BASE_INSTRUCTION.to_string(),
    }
}

/// Single combined prompt for providers without a system role.
pub fn build_combined_prompt(instructions: &str, transcript: &str) -> String {
    format!("{instructions}\n\n{}", transcript_message(transcript))
}

/// User message carrying the transcript.
pub fn transcript_message(transcript: &str) -> String {
    format!("Transcript:\n{transcript}")
}
