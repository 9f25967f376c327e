use actix_web::web;

pub mod handlers;

/// Routes mounted under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::create_withdrawal)
        .service(handlers::list_own_withdrawals)
        .service(handlers::available_balance)
        .service(handlers::get_wallet)
        .service(handlers::get_withdrawal)
        .service(handlers::withdrawal_stats)
        .service(handlers::list_all_withdrawals)
        .service(handlers::approve_withdrawal)
        .service(handlers::reject_withdrawal);
}
