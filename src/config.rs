// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{LegalDocumentRepository, ParticipantRepository, UserRepository},
    services::{AuthService, IntakeService, LegalDocumentService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub intake_service: IntakeService,
    pub legal_service: LegalDocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let participant_repo = ParticipantRepository::new(db_pool.clone());
        let legal_repo = LegalDocumentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let intake_service = IntakeService::new(participant_repo);
        let legal_service = LegalDocumentService::new(legal_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            intake_service,
            legal_service,
        })
    }
}
