use crate::agent::{AgentDefinition, AgentService, AgentSpec, InputFile, Job, UserMessage};
use crate::error::{AnalysisError, Phase};

pub async fn define_agent(
    service: &dyn AgentService,
    spec: AgentSpec,
) -> Result<AgentDefinition, AnalysisError> {
    tracing::debug!(
        target: "sheet_analyst.agent",
        stage = "agent.create.in",
        name = %spec.name,
        model = %spec.model,
        instructions_len = spec.instructions.len(),
        capabilities = spec.capabilities.len()
    );
    let agent = service
        .create_agent(&spec)
        .await
        .map_err(AnalysisError::transport(Phase::AgentConfig))?;
    tracing::info!(
        target: "sheet_analyst.agent",
        stage = "agent.create.out",
        agent_id = %agent.id
    );
    Ok(agent)
}

/// Thread, then message with the upload attached, then the run itself.
pub async fn start_job(
    service: &dyn AgentService,
    agent: &AgentDefinition,
    question: &str,
    input: &InputFile,
) -> Result<Job, AnalysisError> {
    let thread = service
        .create_thread()
        .await
        .map_err(AnalysisError::transport(Phase::Submission))?;
    tracing::debug!(
        target: "sheet_analyst.submit",
        stage = "thread.create.out",
        thread_id = %thread.id
    );

    let message = UserMessage::with_attachment(question, input.file_id.clone());
    service
        .create_message(&thread.id, &message)
        .await
        .map_err(AnalysisError::transport(Phase::Submission))?;
    tracing::debug!(
        target: "sheet_analyst.submit",
        stage = "message.create.out",
        thread_id = %thread.id,
        question_len = question.len(),
        attachments = message.attachments.len()
    );

    let job = service
        .create_job(&thread.id, &agent.id)
        .await
        .map_err(AnalysisError::transport(Phase::Submission))?;
    tracing::info!(
        target: "sheet_analyst.submit",
        stage = "job.create.out",
        job_id = %job.id,
        thread_id = %thread.id,
        status = %job.status
    );
    Ok(job)
}
