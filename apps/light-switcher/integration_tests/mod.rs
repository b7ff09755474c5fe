mod console_session;
